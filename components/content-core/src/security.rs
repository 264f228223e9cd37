//! Element and attribute policy for untrusted blog content
//!
//! This module decides, one node at a time, what the sanitizer keeps:
//!
//! - **Elements**: only tags on the allow-list are retained. Everything else is
//!   unwrapped: the tag goes, its children stay.
//! - **Event handlers**: any attribute whose name begins with `on` is dropped.
//! - **Script-capable URLs**: `href` and `src` values that start with
//!   `javascript:`, `data:` or `vbscript:` are dropped.
//!
//! # Threat Model
//!
//! Blog bodies are written in the admin portal and rendered as raw markup on
//! the public site, so a stolen or careless admin account must not be able to
//! plant stored XSS. The policy is an allow-list for elements and a deny-list
//! for attributes; attribute values other than URLs are passed through.
//!
//! # URL Normalization
//!
//! Before the scheme check the value is trimmed and case-folded. ASCII tab,
//! line feed and carriage return are also removed from inside the value,
//! because URL parsers strip them and `java\tscript:` would otherwise slip
//! through. Entity references (`&#106;avascript:`) are already decoded by the
//! HTML parser before the policy sees the value.

use std::collections::HashSet;

/// Tags retained by the default policy
pub const DEFAULT_ALLOWED_TAGS: &[&str] = &[
    "p",
    "br",
    "b",
    "i",
    "strong",
    "em",
    "u",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "ul",
    "ol",
    "li",
    "blockquote",
    "a",
    "span",
    "div",
];

/// URL schemes that can execute script when followed or loaded
const DANGEROUS_URL_SCHEMES: &[&str] = &[
    "javascript:", // JavaScript execution
    "data:",       // Can contain executable content
    "vbscript:",   // VBScript execution (legacy IE)
];

/// Attributes whose values are URLs and get the scheme check
const URL_ATTRIBUTES: &[&str] = &["href", "src"];

/// Prefix shared by all inline event handler attributes
const EVENT_HANDLER_PREFIX: &str = "on";

/// Action to take for an element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementAction {
    /// Keep the element (attributes are still filtered)
    Keep,
    /// Drop the element and promote its children into its place
    Unwrap,
}

/// Action to take for a single attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeAction {
    /// Pass the attribute through unchanged
    Keep,
    /// Event handler attribute, removed
    RemoveEventHandler,
    /// URL attribute with a script-capable scheme, removed
    RemoveUrl,
}

impl AttributeAction {
    /// Whether the attribute survives
    pub fn is_kept(self) -> bool {
        self == AttributeAction::Keep
    }
}

/// Allow-list policy consulted by the sanitizer
///
/// Tag names are compared in lowercase; html5ever already lowercases HTML
/// tag names, so the comparison is exact for parsed input.
#[derive(Debug, Clone)]
pub struct SecurityPolicy {
    allowed_tags: HashSet<String>,
}

impl SecurityPolicy {
    /// Create a policy with the default blog allow-list
    pub fn new() -> Self {
        Self::with_allowed_tags(DEFAULT_ALLOWED_TAGS.iter().copied())
    }

    /// Create a policy with a custom allow-list
    ///
    /// # Examples
    ///
    /// ```
    /// use site_content_core::security::{ElementAction, SecurityPolicy};
    ///
    /// let policy = SecurityPolicy::with_allowed_tags(["p", "code"]);
    /// assert_eq!(policy.check_element("code"), ElementAction::Keep);
    /// assert_eq!(policy.check_element("div"), ElementAction::Unwrap);
    /// ```
    pub fn with_allowed_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allowed_tags: tags
                .into_iter()
                .map(|tag| tag.as_ref().trim().to_ascii_lowercase())
                .filter(|tag| !tag.is_empty())
                .collect(),
        }
    }

    /// Decide whether an element is kept or unwrapped
    ///
    /// # Examples
    ///
    /// ```
    /// use site_content_core::security::{ElementAction, SecurityPolicy};
    ///
    /// let policy = SecurityPolicy::new();
    /// assert_eq!(policy.check_element("p"), ElementAction::Keep);
    /// assert_eq!(policy.check_element("script"), ElementAction::Unwrap);
    /// assert_eq!(policy.check_element("img"), ElementAction::Unwrap);
    /// ```
    pub fn check_element(&self, tag_name: &str) -> ElementAction {
        if self.allowed_tags.contains(&tag_name.to_ascii_lowercase()) {
            ElementAction::Keep
        } else {
            ElementAction::Unwrap
        }
    }

    /// Decide what happens to one attribute of a retained element
    ///
    /// # Arguments
    ///
    /// * `name` - Attribute local name (e.g. `onclick`, `href`)
    /// * `value` - Attribute value as decoded by the parser
    ///
    /// # Examples
    ///
    /// ```
    /// use site_content_core::security::{AttributeAction, SecurityPolicy};
    ///
    /// let policy = SecurityPolicy::new();
    /// assert_eq!(policy.check_attribute("onclick", "evil()"), AttributeAction::RemoveEventHandler);
    /// assert_eq!(policy.check_attribute("href", " JavaScript:alert(1)"), AttributeAction::RemoveUrl);
    /// assert_eq!(policy.check_attribute("href", "/blog/post"), AttributeAction::Keep);
    /// assert_eq!(policy.check_attribute("class", "javascript:"), AttributeAction::Keep);
    /// ```
    pub fn check_attribute(&self, name: &str, value: &str) -> AttributeAction {
        if is_event_handler(name) {
            return AttributeAction::RemoveEventHandler;
        }

        if is_url_attribute(name) && is_dangerous_url(value) {
            return AttributeAction::RemoveUrl;
        }

        AttributeAction::Keep
    }
}

impl Default for SecurityPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if an attribute is an inline event handler (`onclick`, `ONLOAD`, ...)
pub fn is_event_handler(attr_name: &str) -> bool {
    attr_name
        .get(..EVENT_HANDLER_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(EVENT_HANDLER_PREFIX))
}

fn is_url_attribute(attr_name: &str) -> bool {
    URL_ATTRIBUTES
        .iter()
        .any(|url_attr| attr_name.eq_ignore_ascii_case(url_attr))
}

/// Check if a URL uses a script-capable scheme
///
/// # Examples
///
/// ```
/// use site_content_core::security::is_dangerous_url;
///
/// assert!(is_dangerous_url("javascript:alert('xss')"));
/// assert!(is_dangerous_url("  DATA:text/html,<script>"));
/// assert!(is_dangerous_url("java\tscript:alert(1)"));
/// assert!(!is_dangerous_url("https://example.com"));
/// assert!(!is_dangerous_url("/relative/path"));
/// ```
pub fn is_dangerous_url(url: &str) -> bool {
    let normalized: String = url
        .trim()
        .chars()
        .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
        .collect::<String>()
        .to_lowercase();

    DANGEROUS_URL_SCHEMES
        .iter()
        .any(|scheme| normalized.starts_with(scheme))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_allow_list() {
        let policy = SecurityPolicy::new();

        for tag in DEFAULT_ALLOWED_TAGS {
            assert_eq!(policy.check_element(tag), ElementAction::Keep, "{tag}");
        }

        for tag in ["script", "style", "iframe", "img", "object", "table", "font"] {
            assert_eq!(policy.check_element(tag), ElementAction::Unwrap, "{tag}");
        }
    }

    #[test]
    fn test_element_check_ignores_case() {
        let policy = SecurityPolicy::new();
        assert_eq!(policy.check_element("P"), ElementAction::Keep);
        assert_eq!(policy.check_element("SCRIPT"), ElementAction::Unwrap);
    }

    #[test]
    fn test_custom_allow_list_is_normalized() {
        let policy = SecurityPolicy::with_allowed_tags([" Code ", "", "PRE"]);
        assert_eq!(policy.check_element("code"), ElementAction::Keep);
        assert_eq!(policy.check_element("pre"), ElementAction::Keep);
        assert_eq!(policy.check_element("p"), ElementAction::Unwrap);
    }

    #[test]
    fn test_event_handlers() {
        assert!(is_event_handler("onclick"));
        assert!(is_event_handler("onload"));
        assert!(is_event_handler("OnMouseOver"));
        assert!(is_event_handler("on"));

        assert!(!is_event_handler("href"));
        assert!(!is_event_handler("o"));
        assert!(!is_event_handler("class"));
        assert!(!is_event_handler(""));
    }

    #[test]
    fn test_dangerous_urls() {
        assert!(is_dangerous_url("javascript:alert('xss')"));
        assert!(is_dangerous_url("JavaScript:alert('xss')"));
        assert!(is_dangerous_url("data:text/html,<script>alert('xss')</script>"));
        assert!(is_dangerous_url("vbscript:msgbox('xss')"));
        assert!(is_dangerous_url("\n  javascript:void(0)"));
        assert!(is_dangerous_url("jav\nascript:alert(1)"));

        assert!(!is_dangerous_url("https://example.com"));
        assert!(!is_dangerous_url("mailto:hello@example.com"));
        assert!(!is_dangerous_url("#anchor"));
        assert!(!is_dangerous_url("/blog/javascript:not-a-scheme"));
        assert!(!is_dangerous_url(""));
    }

    #[test]
    fn test_check_attribute() {
        let policy = SecurityPolicy::new();

        assert_eq!(
            policy.check_attribute("onerror", "x"),
            AttributeAction::RemoveEventHandler
        );
        assert_eq!(
            policy.check_attribute("src", "data:image/png;base64,AAAA"),
            AttributeAction::RemoveUrl
        );
        assert_eq!(
            policy.check_attribute("title", "vbscript:hello"),
            AttributeAction::Keep
        );
        assert!(policy.check_attribute("href", "https://example.com").is_kept());
    }

    proptest! {
        #[test]
        fn prop_dangerous_url_schemes_are_rejected(
            leading_ws in "[ \\t\\n\\r]{0,3}",
            payload in "[A-Za-z0-9_/?=&:%#.-]{0,64}",
            uppercase in any::<bool>(),
        ) {
            for scheme in DANGEROUS_URL_SCHEMES {
                let scheme_variant = if uppercase {
                    scheme.to_uppercase()
                } else {
                    scheme.to_string()
                };
                let candidate = format!("{leading_ws}{scheme_variant}{payload}");

                prop_assert!(
                    is_dangerous_url(&candidate),
                    "Dangerous scheme should be detected regardless of case/leading whitespace: {candidate}"
                );
            }
        }

        #[test]
        fn prop_on_prefixed_names_are_event_handlers(suffix in "[a-zA-Z]{0,16}", upper in any::<bool>()) {
            let name = if upper { format!("ON{suffix}") } else { format!("on{suffix}") };
            prop_assert!(is_event_handler(&name));
        }
    }
}
