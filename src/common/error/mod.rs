//! Unified error types for the document engine.
//!
//! Every public operation (parse, write, edit, template) reports failures
//! through the single [`Error`] enum defined here.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
