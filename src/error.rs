//! Custom error types for pubmed_papers.
//!
//! This module defines all error types used throughout the library.
//! All functions return `Result<T, PaperError>` instead of using `unwrap()`.

use thiserror::Error;

/// Main error type for pubmed_papers operations.
///
/// Uses `thiserror` for ergonomic error handling and automatic `Display` implementation.
#[derive(Debug, Error)]
pub enum PaperError {
    /// Transport failure or non-2xx status from an E-utilities endpoint
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A fetched document could not be turned into a record
    #[error("Parse error: {0}")]
    Parse(#[from] ParseFailure),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}

impl PaperError {
    /// True for failures of the transport or of the remote service.
    pub fn is_network(&self) -> bool {
        matches!(self, PaperError::Network(_))
    }
}

/// Why a PubMed XML document yielded no record.
#[derive(Debug, Error)]
pub enum ParseFailure {
    /// The XML reader rejected the input
    #[error("malformed XML: {0}")]
    Malformed(#[from] quick_xml::Error),

    /// An attribute could not be parsed (duplicate, unquoted, ...)
    #[error("malformed attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    /// Element or attribute content is not valid text
    #[error("invalid text content: {0}")]
    Encoding(String),

    /// Input ended while an element was still open
    #[error("unclosed element <{0}>")]
    Unclosed(String),

    /// Input contained no element at all
    #[error("no root element")]
    NoRoot,

    /// Non-whitespace text outside any element
    #[error("text outside the root element")]
    StrayText,

    /// Element found after the root element closed
    #[error("content after the root element")]
    TrailingContent,

    /// The document has neither MedlineCitation/PMID nor BookDocument/PMID
    #[error("document has no PubMed identifier")]
    MissingIdentifier,
}

/// Result type alias using `PaperError`
pub type Result<T> = std::result::Result<T, PaperError>;
