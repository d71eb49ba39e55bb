/// Word (.docx) document support.
///
/// This module reads WordprocessingML packages into a [`Document`] tree,
/// writes documents back into minimal packages, and offers two raw-package
/// operations that never build a tree: literal find/replace ([`edit_bytes`])
/// and placeholder templating ([`template`]).
///
/// # Architecture
///
/// - `Package`: an opened .docx with its main document part resolved
/// - `Document`: ordered body nodes plus core properties
/// - `Node`: paragraph, heading, list item or table
/// - `DocumentWriter`: serializes a `Document` into package bytes
///
/// # Example
///
/// ```rust,no_run
/// use wordkit::ooxml::docx::{Node, Package};
///
/// let package = Package::open("document.docx")?;
/// let doc = package.document()?;
///
/// for node in &doc.nodes {
///     match node {
///         Node::Heading(h) => println!("{} {}", "#".repeat(h.level as usize), h.text),
///         Node::Table(t) => println!("[table with {} rows]", t.rows.len()),
///         other => println!("{}", other.text()),
///     }
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub mod editor;
pub mod model;
pub mod package;
pub mod properties;
pub(crate) mod reader;
pub mod template;
pub mod writer;

pub use editor::{EditOutcome, edit_bytes, edit_file};
pub use model::{
    Document, Heading, ListInfo, ListItem, Node, NodeKind, Paragraph, Run, Table, TableRow,
};
pub use package::{Package, parse, parse_file};
pub use template::{
    ApplyResult, TemplateEngine, TemplateOptions, TemplateOutput, Variable, extract_variables,
};
pub use writer::{DocumentWriter, WriterOptions, write};
