//! Error types for swrlimg library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for swrlimg operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while post-processing documentation.
///
/// Pages that were already processed are not errors; they are reported as
/// outcomes (see [`crate::inject::Injection`] and [`crate::head::LinkOutcome`]).
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A vector asset's width/height attributes are missing or malformed.
    #[error("Invalid asset size in {path}: {reason}")]
    AssetParse {
        /// Path of the offending asset
        path: PathBuf,
        /// What was wrong with it
        reason: String,
    },

    /// One member of an asset pair does not exist on disk.
    #[error("Asset not found: {0}")]
    AssetNotFound(PathBuf),

    /// The HTML rewriter rejected the document.
    #[error("HTML rewriting error: {0}")]
    Rewrite(String),

    /// A selector built from the page layout is invalid.
    #[error("Invalid selector {selector:?}: {reason}")]
    Selector {
        /// The selector text
        selector: String,
        /// Parser message
        reason: String,
    },

    /// An option value is out of range.
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// Error serializing a report.
    #[error("Serialization error: {0}")]
    Serialize(String),
}

impl Error {
    /// Build an [`Error::AssetParse`] for `path`.
    pub fn asset_parse(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::AssetParse {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl From<lol_html::errors::RewritingError> for Error {
    fn from(err: lol_html::errors::RewritingError) -> Self {
        Error::Rewrite(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialize(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::AssetNotFound(PathBuf::from("swrlrules/rule_1-head.svg"));
        assert_eq!(err.to_string(), "Asset not found: swrlrules/rule_1-head.svg");

        let err = Error::asset_parse("rule_2-body.svg", "missing height attribute");
        assert_eq!(
            err.to_string(),
            "Invalid asset size in rule_2-body.svg: missing height attribute"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_selector_error_display() {
        let err = Error::Selector {
            selector: "#".to_string(),
            reason: "unexpected end".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid selector \"#\": unexpected end");
    }
}
