//! Common types and utilities shared by the package, document, diff and
//! template layers.

// Submodule declarations
pub mod error;
pub mod metadata;
pub mod xml;

// Re-exports for convenience
pub use error::{Error, Result};
pub use metadata::Metadata;
