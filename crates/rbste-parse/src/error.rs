//! Error types for document loading and text extraction.
//!
//! Uses [`thiserror`] for derivation. Messages from lopdf are carried as
//! strings so callers see the underlying parser's own wording.

use thiserror::Error;

/// Error raised while loading a statement PDF or extracting its text.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Error from PDF parsing (structure, syntax, object resolution).
    #[error("PDF parse error: {0}")]
    Parse(String),

    /// Error reading the source file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document is encrypted; statements are expected to be plain.
    #[error("PDF is encrypted")]
    Encrypted,

    /// Error resolving font or encoding information.
    #[error("font error: {0}")]
    Font(String),

    /// Error during content stream interpretation.
    #[error("interpreter error: {0}")]
    Interpreter(String),

    /// Requested page does not exist.
    #[error("page index {index} out of range (document has {count} pages)")]
    PageOutOfRange { index: usize, count: usize },
}

impl From<lopdf::Error> for ExtractError {
    fn from(err: lopdf::Error) -> Self {
        ExtractError::Parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
