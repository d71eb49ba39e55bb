//! XML text helpers shared by the reader, writer and template engine.

mod escape;

pub use escape::{escape_xml, resolve_entity};
