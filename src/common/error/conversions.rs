//! Error conversion implementations.
//!
//! This module contains From trait implementations to convert from the
//! ZIP and XML crates' error types to the unified Error type.

use super::types::Error;

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::InvalidArchive(e.to_string()),
            other => Error::InvalidArchive(other.to_string()),
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::malformed("?", err)
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::malformed("?", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zip_error_maps_to_invalid_archive() {
        let err: Error = zip::result::ZipError::InvalidArchive("bad magic".into()).into();
        assert!(matches!(err, Error::InvalidArchive(_)));
    }
}
