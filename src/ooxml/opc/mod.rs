/// Open Packaging Conventions (OPC) layer.
///
/// This module provides the container side of a WordprocessingML package:
///
/// - ZIP-based physical packaging with part-preserving rewrites (`phys_pkg`)
/// - Relationship parts (`rel`)
/// - Fresh package serialization with a content-type manifest (`pkgwriter`)
/// - Well-known content types, namespaces and part names (`constants`)
pub mod constants;
pub mod phys_pkg;
pub mod pkgwriter;
pub mod rel;

// Re-export commonly used types
pub use phys_pkg::{PartEntry, PhysPkgReader, PhysPkgWriter};
pub use pkgwriter::PackageWriter;
pub use rel::Relationship;
