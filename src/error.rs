//! Error types for bookweave library.

use std::io;
use thiserror::Error;

use crate::model::ContentType;

/// Result type alias for bookweave operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while segmenting, translating or rendering.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error reading or writing JSON (extractor dumps, serialized books).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error decoding or encoding an image.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Requested page limit is beyond the document.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// A raw table grid disagrees with the grid built from it.
    #[error("Table shape mismatch: {0}")]
    ShapeMismatch(String),

    /// A translation payload does not match the content unit's type.
    #[error("Invalid translation type: expected {expected}, got {found}")]
    TypeMismatch {
        /// Type of the content unit
        expected: ContentType,
        /// Kind of payload that was supplied
        found: &'static str,
    },

    /// The translation slot of a content unit was already filled.
    #[error("Content already translated")]
    AlreadyTranslated,

    /// Render target is not recognized.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// A content unit has no coordinates where layout needs them.
    #[error("Content has no coordinates: {0}")]
    Unpositioned(String),

    /// Error rasterizing an image region of a page.
    #[error("Image extraction error: {0}")]
    ImageExtract(String),

    /// Error during rendering (PDF, Markdown).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "Page 10 is out of range (document has 5 pages)"
        );

        let err = Error::TypeMismatch {
            expected: ContentType::Text,
            found: "table",
        };
        assert_eq!(
            err.to_string(),
            "Invalid translation type: expected text, got table"
        );

        let err = Error::UnsupportedFormat("docx".to_string());
        assert_eq!(err.to_string(), "Unsupported file format: docx");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
