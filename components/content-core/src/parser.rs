//! HTML5 fragment parsing using html5ever
//!
//! Blog content arrives as an HTML fragment (no doctype, no `<html>` or
//! `<body>` wrapper). The fragment is parsed as a full document, exactly as a
//! browser's `DOMParser` would, and the resulting `<body>` element is handed
//! to the sanitizer.
//!
//! # Overview
//!
//! html5ever implements the WHATWG HTML5 parsing algorithm, so malformed
//! markup (unclosed tags, misnested formatting, stray end tags) is repaired
//! the same way browsers repair it. Nothing is executed and no external
//! resource is loaded.
//!
//! # Examples
//!
//! ```rust
//! use markup5ever_rcdom::NodeData;
//! use site_content_core::parser::parse_fragment;
//!
//! let fragment = parse_fragment("<p>Hello</p>").expect("body element");
//! assert!(matches!(fragment.body().data, NodeData::Element { .. }));
//! assert_eq!(fragment.body().children.borrow().len(), 1);
//! ```

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::error::ContentError;

/// A parsed fragment: the owning DOM plus a handle to its `<body>`
///
/// The DOM must outlive any traversal of the body. Dropping an `RcDom`
/// detaches every descendant's children, even ones still referenced
/// elsewhere.
pub struct ParsedFragment {
    #[allow(dead_code)]
    dom: RcDom,
    body: Handle,
}

impl ParsedFragment {
    /// The `<body>` element of the parsed document
    pub fn body(&self) -> &Handle {
        &self.body
    }
}

/// Parse an HTML fragment and return its document body
///
/// # Arguments
///
/// * `html` - Untrusted HTML (or plain text) to parse
///
/// # Returns
///
/// Returns `Ok(ParsedFragment)` giving access to the `<body>` element of the
/// parsed document.
///
/// # Errors
///
/// - `ContentError::InvalidInput`: Input is empty
/// - `ContentError::ParseError`: The parsed document has no `<body>` element
pub fn parse_fragment(html: &str) -> Result<ParsedFragment, ContentError> {
    if html.is_empty() {
        return Err(ContentError::InvalidInput(
            "HTML input is empty".to_string(),
        ));
    }

    let dom = parse_document(RcDom::default(), Default::default()).one(html);

    let body = find_body(&dom.document).ok_or_else(|| {
        ContentError::ParseError("parsed document has no body element".to_string())
    })?;

    Ok(ParsedFragment { dom, body })
}

/// Locate the `<body>` element under the document root
///
/// The body is always a child of the root `<html>` element, so only two
/// levels are inspected.
pub fn find_body(document: &Handle) -> Option<Handle> {
    let html = find_child_element(document, "html")?;
    find_child_element(&html, "body")
}

fn find_child_element(parent: &Handle, tag: &str) -> Option<Handle> {
    parent
        .children
        .borrow()
        .iter()
        .find(|child| match child.data {
            NodeData::Element { ref name, .. } => name.local.as_ref() == tag,
            _ => false,
        })
        .cloned()
}
