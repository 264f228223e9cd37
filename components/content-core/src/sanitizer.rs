//! Allow-list HTML sanitizer for blog content
//!
//! Converts untrusted, author-supplied HTML into markup that is safe to inject
//! into a page as-is, without losing legitimate formatting.
//!
//! # Strategy
//!
//! The input is parsed with html5ever and the `<body>` subtree is rewritten
//! into an owned [`SanitizedNode`] tree by a depth-first walk:
//!
//! 1. **Text** nodes are kept.
//! 2. **Allowed elements** are kept with their attributes filtered through the
//!    [`SecurityPolicy`] (event handlers and script-capable URLs are dropped).
//! 3. **Other elements** are unwrapped: the tag is dropped and its children are
//!    spliced into the parent's child list at the same position, then walked
//!    in turn. Nested disallowed wrappers therefore cascade.
//! 4. Comments, doctypes and processing instructions are dropped.
//!
//! The rewritten tree is then serialized back to HTML. Because a browser
//! re-parses that HTML, the pass is repeated until the output no longer
//! changes, which makes sanitizing idempotent.
//!
//! # Degradation
//!
//! Sanitizing never fails. If the parsed document has no body (a leading
//! `<frameset>`) or the tree is nested deeper than the configured limit, the
//! whole input is returned as escaped plain text instead.
//!
//! # Examples
//!
//! ```rust
//! use site_content_core::sanitizer::sanitize;
//!
//! let html = r#"<img src="javascript:alert(1)"><p onclick="evil()">Hello</p>"#;
//! assert_eq!(sanitize(html), "<p>Hello</p>");
//!
//! assert_eq!(sanitize(None), "");
//! assert_eq!(sanitize("plain words"), "plain words");
//! ```

use std::sync::LazyLock;

use markup5ever_rcdom::{Handle, NodeData};
use serde::Deserialize;

use crate::content::ContentItem;
use crate::error::ContentError;
use crate::parser::parse_fragment;
use crate::security::{DEFAULT_ALLOWED_TAGS, ElementAction, SecurityPolicy};

/// Maximum nesting depth walked before falling back to escaped text
pub const DEFAULT_MAX_DEPTH: usize = 512;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Upper bound on sanitize passes spent reaching a re-parse-stable output
const MAX_SETTLE_PASSES: usize = 4;

/// Elements serialized without an end tag or children
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Elements whose text children are serialized verbatim
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "style",
    "script",
    "xmp",
    "iframe",
    "noembed",
    "noframes",
    "plaintext",
];

static DEFAULT_SANITIZER: LazyLock<ContentSanitizer> = LazyLock::new(ContentSanitizer::new);

/// Sanitizer configuration
///
/// Deserializable so a host can keep it alongside its own settings:
///
/// ```rust
/// use site_content_core::sanitizer::SanitizerOptions;
///
/// let options: SanitizerOptions =
///     serde_json::from_str(r#"{ "allowed_tags": ["p", "a"] }"#).unwrap();
/// assert_eq!(options.allowed_tags, vec!["p", "a"]);
/// assert_eq!(options.max_depth, 512);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SanitizerOptions {
    /// Tags kept in the output; all others are unwrapped
    pub allowed_tags: Vec<String>,
    /// Deepest element nesting walked before degrading to escaped text
    pub max_depth: usize,
}

impl Default for SanitizerOptions {
    fn default() -> Self {
        Self {
            allowed_tags: DEFAULT_ALLOWED_TAGS.iter().map(|t| t.to_string()).collect(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// A node of the rewritten, owned output tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SanitizedNode {
    /// Character data, unescaped
    Text(String),
    /// Retained element with its surviving attributes
    Element {
        name: String,
        attrs: Vec<(String, String)>,
        children: Vec<SanitizedNode>,
    },
}

/// Allow-list HTML sanitizer
///
/// Holds no per-call state; one instance can be shared across threads.
#[derive(Debug, Clone)]
pub struct ContentSanitizer {
    policy: SecurityPolicy,
    max_depth: usize,
}

impl ContentSanitizer {
    /// Create a sanitizer with the default blog allow-list
    pub fn new() -> Self {
        Self {
            policy: SecurityPolicy::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Create a sanitizer from explicit options
    pub fn with_options(options: SanitizerOptions) -> Self {
        Self {
            policy: SecurityPolicy::with_allowed_tags(&options.allowed_tags),
            max_depth: options.max_depth,
        }
    }

    /// Sanitize untrusted HTML
    ///
    /// Returns an empty string for empty input. Never fails: when the input
    /// cannot be sanitized structurally it is returned as escaped text.
    pub fn sanitize(&self, raw: &str) -> String {
        if raw.is_empty() {
            return String::new();
        }

        let mut output = match self.try_sanitize(raw) {
            Ok(html) => html,
            Err(err) => {
                if matches!(err, ContentError::DepthExceeded { .. }) {
                    tracing::warn!(error = %err, "content too deeply nested, escaping as text");
                } else {
                    tracing::debug!(error = %err, "content not parseable, escaping as text");
                }
                return escape_fallback(raw);
            }
        };

        // Re-parsing the output may restructure it (a heading split off from
        // its parent heading, nested anchors); settle on a stable rendition
        for _ in 1..MAX_SETTLE_PASSES {
            match self.try_sanitize(&output) {
                Ok(next) if next != output => output = next,
                _ => break,
            }
        }
        output
    }

    /// Sanitize the renderable body of a content item
    ///
    /// Uses the item's raw content, or its excerpt when the content is empty.
    pub fn sanitize_item(&self, item: &ContentItem) -> String {
        self.sanitize(item.body())
    }

    /// Run a single sanitize pass, surfacing the reason when the structural
    /// path fails
    ///
    /// # Errors
    ///
    /// - `ContentError::InvalidInput`: Input is empty
    /// - `ContentError::ParseError`: The document has no body
    /// - `ContentError::DepthExceeded`: Nesting is deeper than `max_depth`
    pub fn try_sanitize(&self, raw: &str) -> Result<String, ContentError> {
        let fragment = parse_fragment(raw)?;
        let mut nodes = self.rewrite(fragment.body())?;
        trim_leading_whitespace(&mut nodes);

        let mut output = String::with_capacity(raw.len());
        serialize_nodes(&nodes, &mut output, false);
        Ok(output)
    }

    /// Rewrite the children of `root` into the owned output tree
    pub fn rewrite(&self, root: &Handle) -> Result<Vec<SanitizedNode>, ContentError> {
        let mut nodes = Vec::new();
        self.rewrite_children(root, 1, &mut nodes)?;
        Ok(nodes)
    }

    fn rewrite_children(
        &self,
        node: &Handle,
        depth: usize,
        out: &mut Vec<SanitizedNode>,
    ) -> Result<(), ContentError> {
        for child in node.children.borrow().iter() {
            self.rewrite_node(child, depth, out)?;
        }
        Ok(())
    }

    fn rewrite_node(
        &self,
        node: &Handle,
        depth: usize,
        out: &mut Vec<SanitizedNode>,
    ) -> Result<(), ContentError> {
        if depth > self.max_depth {
            return Err(ContentError::DepthExceeded {
                depth,
                max: self.max_depth,
            });
        }

        match node.data {
            NodeData::Text { ref contents } => {
                out.push(SanitizedNode::Text(contents.borrow().to_string()));
            }
            NodeData::Element {
                ref name,
                ref attrs,
                ..
            } => {
                let tag_name = name.local.as_ref();
                match self.policy.check_element(tag_name) {
                    ElementAction::Unwrap => {
                        // Children take the wrapper's place in `out`
                        self.rewrite_children(node, depth + 1, out)?;
                    }
                    ElementAction::Keep => {
                        let attrs = attrs
                            .borrow()
                            .iter()
                            .filter(|attr| {
                                self.policy
                                    .check_attribute(attr.name.local.as_ref(), &attr.value)
                                    .is_kept()
                            })
                            .map(|attr| {
                                let attr_name = match attr.name.prefix {
                                    Some(ref prefix) => format!("{}:{}", prefix, attr.name.local),
                                    None => attr.name.local.to_string(),
                                };
                                (attr_name, attr.value.to_string())
                            })
                            .collect();

                        let mut children = Vec::new();
                        self.rewrite_children(node, depth + 1, &mut children)?;

                        out.push(SanitizedNode::Element {
                            name: tag_name.to_ascii_lowercase(),
                            attrs,
                            children,
                        });
                    }
                }
            }
            NodeData::Document
            | NodeData::Doctype { .. }
            | NodeData::Comment { .. }
            | NodeData::ProcessingInstruction { .. } => {}
        }

        Ok(())
    }
}

impl Default for ContentSanitizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Sanitize untrusted HTML with the default allow-list
///
/// Accepts `&str` or `Option<&str>`; absent and empty input both produce an
/// empty string.
pub fn sanitize<'a>(raw: impl Into<Option<&'a str>>) -> String {
    match raw.into() {
        Some(raw) => DEFAULT_SANITIZER.sanitize(raw),
        None => String::new(),
    }
}

/// Sanitize a content item's body with the default allow-list
pub fn sanitize_item(item: &ContentItem) -> String {
    DEFAULT_SANITIZER.sanitize_item(item)
}

/// Escape text for use as HTML character data
///
/// Escapes `&`, `<`, `>` and U+00A0, matching how an HTML serializer writes
/// text nodes.
///
/// # Examples
///
/// ```rust
/// use site_content_core::sanitizer::escape_text;
///
/// assert_eq!(escape_text("<b>Tom & Jerry</b>"), "&lt;b&gt;Tom &amp; Jerry&lt;/b&gt;");
/// ```
pub fn escape_text(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    push_escaped_text(text, &mut output);
    output
}

fn push_escaped_text(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '\u{a0}' => output.push_str("&nbsp;"),
            _ => output.push(c),
        }
    }
}

fn push_escaped_attribute(value: &str, output: &mut String) {
    for c in value.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '"' => output.push_str("&quot;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '\u{a0}' => output.push_str("&nbsp;"),
            _ => output.push(c),
        }
    }
}

/// Plain-text rendition of input that could not be sanitized structurally
///
/// Newlines, a leading byte order mark and leading whitespace are normalized
/// the way the parser would normalize body text, so sanitizing the result
/// again yields the same string.
fn escape_fallback(raw: &str) -> String {
    let normalized = raw.replace("\r\n", "\n").replace('\r', "\n").replace('\0', "");
    escape_text(
        normalized.trim_start_matches(|c: char| c == BYTE_ORDER_MARK || is_html_whitespace(c)),
    )
}

fn is_html_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0C' | '\r')
}

/// Drop whitespace that a parser discards at the very start of a document
fn trim_leading_whitespace(nodes: &mut Vec<SanitizedNode>) {
    while let Some(SanitizedNode::Text(text)) = nodes.first_mut() {
        let trimmed = text.trim_start_matches(is_html_whitespace);
        if trimmed.is_empty() {
            nodes.remove(0);
        } else {
            *text = trimmed.to_string();
            break;
        }
    }
}

/// Serialize an output tree to HTML
pub fn serialize_nodes(nodes: &[SanitizedNode], output: &mut String, raw_text: bool) {
    for node in nodes {
        match node {
            SanitizedNode::Text(text) => {
                if raw_text {
                    output.push_str(text);
                } else {
                    push_escaped_text(text, output);
                }
            }
            SanitizedNode::Element {
                name,
                attrs,
                children,
            } => {
                output.push('<');
                output.push_str(name);
                for (attr_name, value) in attrs {
                    output.push(' ');
                    output.push_str(attr_name);
                    output.push_str("=\"");
                    push_escaped_attribute(value, output);
                    output.push('"');
                }
                output.push('>');

                if VOID_ELEMENTS.contains(&name.as_str()) {
                    continue;
                }

                serialize_nodes(
                    children,
                    output,
                    RAW_TEXT_ELEMENTS.contains(&name.as_str()),
                );
                output.push_str("</");
                output.push_str(name);
                output.push('>');
            }
        }
    }
}
