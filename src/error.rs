//! Error types for the slidescene library.

use std::io;
use thiserror::Error;

/// Result type alias for slidescene operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reconstructing a presentation.
///
/// Only [`Error::MalformedPackage`] (and a missing `ppt/presentation.xml`,
/// reported as [`Error::MissingPart`]) terminate a parse. Every other
/// condition is absorbed close to where it occurs and replaced with a
/// documented fallback: a default theme, a placeholder image payload, a
/// skipped element.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The archive could not be opened or read as a ZIP package.
    #[error("Malformed package: {0}")]
    MalformedPackage(String),

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// An expected XML part is absent from the package.
    #[error("Missing part: {0}")]
    MissingPart(String),

    /// A relationship ID does not exist in the part's relationship table.
    #[error("Missing relationship: {0}")]
    MissingRelationship(String),

    /// Image media could not be located under any path strategy.
    #[error("Unresolved media: {0}")]
    UnresolvedMedia(String),

    /// Invalid or malformed data in the document.
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::MalformedPackage(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::MalformedPackage("not a zip".to_string());
        assert_eq!(err.to_string(), "Malformed package: not a zip");

        let err = Error::MissingRelationship("rId7".to_string());
        assert_eq!(err.to_string(), "Missing relationship: rId7");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_from_zip() {
        let zip_err = zip::result::ZipError::FileNotFound;
        let err: Error = zip_err.into();
        assert!(matches!(err, Error::MalformedPackage(_)));
    }
}
