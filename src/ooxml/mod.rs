//! Office Open XML (OOXML) format implementation.
//!
//! The module is organized into two layers:
//!
//! 1. **OPC Layer** (`opc`): low-level package handling (ZIP members,
//!    relationships, content types, part-preserving rewrites)
//! 2. **Word** (`docx`): the WordprocessingML reader, writer, editor and
//!    template engine
//!
//! # Example: Working with Word Documents
//!
//! ```rust,no_run
//! use wordkit::ooxml::docx::Package;
//!
//! let pkg = Package::open("document.docx")?;
//! let doc = pkg.document()?;
//! println!("Document contains {} body nodes", doc.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod docx;
pub mod opc;

pub use opc::{PackageWriter, PhysPkgReader};
