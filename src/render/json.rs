//! JSON serialization of books.

use crate::error::{Error, Result};
use crate::model::Book;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a book to JSON, readable again with [`Book::from_json`].
pub fn to_json(book: &Book, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(book),
        JsonFormat::Compact => serde_json::to_string(book),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}
