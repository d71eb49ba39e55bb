//! Wordkit - a WordprocessingML (.docx) engine
//!
//! This library reads and writes Word documents and offers three operations
//! that work on packages directly.
//!
//! # Features
//!
//! - **Reader**: Parse a .docx into an ordered tree of paragraphs, headings,
//!   list items and tables, with core properties
//! - **Writer**: Serialize a document tree into a minimal, valid package
//! - **Raw editor**: Literal find/replace across the Word XML parts, leaving
//!   every other archive member byte-for-byte intact
//! - **Diff**: Paragraph-level LCS comparison with unified-diff output
//! - **Templates**: `{{name}}` substitution that repairs placeholders Word has
//!   split across formatting runs
//!
//! # Example - Reading a DOCX file
//!
//! ```no_run
//! use wordkit::Package;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pkg = Package::open("document.docx")?;
//! let doc = pkg.document()?;
//!
//! println!("Title: {:?}", doc.metadata.title);
//! for node in &doc.nodes {
//!     println!("[{:?}] {}", node.kind(), node.text());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Writing a document
//!
//! ```no_run
//! use wordkit::ooxml::docx::{Document, Heading, Paragraph};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let doc = Document::new()
//!     .with_node(Heading::new(1, "Quarterly report"))
//!     .with_node(Paragraph::new("Revenue grew."));
//! std::fs::write("report.docx", wordkit::write(&doc)?)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Filling a template
//!
//! ```no_run
//! use std::collections::HashMap;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("letter.docx")?;
//! for var in wordkit::extract_variables(&bytes)? {
//!     println!("needs {}", var.name);
//! }
//!
//! let values = HashMap::from([("name".to_string(), "Alice".to_string())]);
//! let out = wordkit::TemplateEngine::new().apply(&bytes, &values)?;
//! std::fs::write("letter-alice.docx", out.bytes)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Comparing revisions
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let v1 = wordkit::parse(&std::fs::read("v1.docx")?)?;
//! let v2 = wordkit::parse(&std::fs::read("v2.docx")?)?;
//! print!("{}", wordkit::diff_documents(&v1, &v2, 3).to_unified());
//! # Ok(())
//! # }
//! ```

pub mod common;
pub mod diff;
pub mod ooxml;

pub use common::{Error, Metadata, Result};
pub use diff::{DiffOptions, DiffResult, diff_documents, diff_paragraphs};
pub use ooxml::docx::{
    Document, DocumentWriter, EditOutcome, Node, Package, TemplateEngine, TemplateOptions,
    WriterOptions, edit_bytes, edit_file, extract_variables, parse, parse_file, write,
};
