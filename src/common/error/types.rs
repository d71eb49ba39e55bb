//! Error taxonomy for package, XML and file failures.
use thiserror::Error;

/// Main error type for document engine operations.
///
/// Operations fail fast and atomically: when one of these is returned no
/// partially built document or partially written archive is exposed.
#[derive(Error, Debug)]
pub enum Error {
    /// The input is not a valid ZIP container
    #[error("Invalid archive: {0}")]
    InvalidArchive(String),

    /// The main document part is absent from the package
    #[error("Missing body part: {0}")]
    MissingBodyPart(String),

    /// The XML token stream could not be decoded
    #[error("Malformed XML in <{element}>: {message}")]
    MalformedXml {
        /// Name of the enclosing element, `?` when unknown
        element: String,
        /// Decoder message
        message: String,
    },

    /// IO error from the file helpers
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a [`Error::MalformedXml`] for the given enclosing element.
    pub(crate) fn malformed(element: impl Into<String>, message: impl ToString) -> Self {
        Error::MalformedXml {
            element: element.into(),
            message: message.to_string(),
        }
    }

    /// Whether this error means the input bytes are not a usable document.
    ///
    /// Callers surface these as "not a valid document" style messages, while
    /// IO errors point at the surrounding file handling.
    pub fn is_corrupt_input(&self) -> bool {
        matches!(
            self,
            Error::InvalidArchive(_) | Error::MissingBodyPart(_) | Error::MalformedXml { .. }
        )
    }
}

/// Result type for document engine operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_display_names_element() {
        let err = Error::malformed("w:body", "unexpected end of file");
        assert_eq!(
            err.to_string(),
            "Malformed XML in <w:body>: unexpected end of file"
        );
        assert!(err.is_corrupt_input());
    }

    #[test]
    fn test_io_is_not_corrupt_input() {
        let err = Error::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(!err.is_corrupt_input());
    }
}
