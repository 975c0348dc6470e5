//! Error types for multimark library.

use crate::model::ElementKind;
use crate::render::OutputFormat;
use std::io;
use thiserror::Error;

/// Result type alias for multimark operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while rendering an element tree.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The emitter for a format has no rendering for an element kind.
    #[error("{format} output cannot render element kind `{kind}`")]
    UnhandledElement {
        /// Emitter that gave up
        format: OutputFormat,
        /// Offending element kind
        kind: ElementKind,
    },

    /// An element lacks the payload or children its kind requires.
    #[error("Malformed `{kind}` element: {reason}")]
    MalformedElement {
        /// Kind of the malformed element
        kind: ElementKind,
        /// What is missing
        reason: String,
    },

    /// The tree references missing elements or contains a cycle.
    #[error("Invalid element tree: {0}")]
    InvalidTree(String),

    /// The requested output format name is not recognized.
    #[error("Unknown output format: {0}")]
    UnknownFormat(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Build an [`Error::UnhandledElement`].
    pub fn unhandled(format: OutputFormat, kind: ElementKind) -> Self {
        Error::UnhandledElement { format, kind }
    }

    /// Build an [`Error::MalformedElement`].
    pub fn malformed(kind: ElementKind, reason: impl Into<String>) -> Self {
        Error::MalformedElement {
            kind,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::unhandled(OutputFormat::GroffMm, ElementKind::Table);
        assert_eq!(
            err.to_string(),
            "groff-mm output cannot render element kind `table`"
        );

        let err = Error::malformed(ElementKind::Link, "missing link target");
        assert_eq!(
            err.to_string(),
            "Malformed `link` element: missing link target"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
