//! Error types for content processing
//!
//! The public sanitizer and ranker never surface these to callers; they are
//! used on internal paths (parsing, depth checks, JSON ingestion) and absorbed
//! by the degrade-gracefully fallbacks.

use thiserror::Error;

/// Errors that can occur while parsing or ingesting content
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContentError {
    /// HTML parsing produced no usable document body
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Nesting depth of the parsed tree exceeded the configured limit
    #[error("HTML nesting depth {depth} exceeds maximum allowed depth {max}")]
    DepthExceeded { depth: usize, max: usize },
    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
