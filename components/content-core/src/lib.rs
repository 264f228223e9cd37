//! Site Content Core - blog content logic for the marketing site
//!
//! This library holds the pure content logic behind the public blog: making
//! author-supplied HTML safe to render, picking related posts, and the small
//! listing helpers the index and card views need. It performs no I/O; callers
//! fetch the listing from the content service and hand the results to their
//! rendering layer.
//!
//! # Architecture
//!
//! The library is structured into several modules:
//! - `parser`: HTML5 fragment parsing using html5ever
//! - `security`: Element allow-list and attribute/URL policy
//! - `sanitizer`: Allow-list tree rewrite and HTML serialization
//! - `content`: Content items and lenient JSON ingestion
//! - `ranker`: Related-content scoring and selection
//! - `listing`: Index filters, category menu, excerpts and dates
//! - `error`: Error types for the internal fallible paths
//!
//! # Failure Policy
//!
//! Neither the sanitizer nor the ranker returns errors. Unparseable content
//! degrades to escaped text; malformed listings degrade to empty or partial
//! results.

// Module declarations
pub mod content;
pub mod error;
pub mod listing;
pub mod parser;
pub mod ranker;
pub mod sanitizer;
pub mod security;

// Re-export main types for convenience
pub use content::{ContentItem, PostType, items_from_json};
pub use error::ContentError;
pub use listing::{ListingFilter, filter_listing, format_published_date, truncate_excerpt};
pub use ranker::{RelatedContentRanker, rank_related, rank_related_json};
pub use sanitizer::{ContentSanitizer, SanitizerOptions, sanitize, sanitize_item};
