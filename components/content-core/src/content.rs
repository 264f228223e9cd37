//! Content items as delivered by the content-listing service
//!
//! Blog posts reach the site as JSON objects from the REST backend. Fields are
//! optional in practice (older posts lack tags, company updates may lack a
//! category, drafts may lack a slug), so ingestion is lenient: a wrong-typed
//! or missing field is treated as absent. Only values that are not objects
//! are rejected.
//!
//! # Examples
//!
//! ```rust
//! use serde_json::json;
//! use site_content_core::content::{ContentItem, PostType};
//!
//! let item = ContentItem::from_json(&json!({
//!     "slug": "zero-trust-guide",
//!     "title": "Zero Trust Security",
//!     "category": "Cybersecurity",
//!     "tags": ["security", 42, "zero-trust"],
//!     "post_type": "company-update",
//! }))
//! .unwrap();
//!
//! assert_eq!(item.identifier.as_deref(), Some("zero-trust-guide"));
//! assert_eq!(item.tags, vec!["security", "zero-trust"]);
//! assert_eq!(item.post_type, Some(PostType::CompanyUpdate));
//! ```

use serde_json::{Map, Value};

use crate::error::ContentError;

/// Identifier fields, in lookup order
const IDENTIFIER_FIELDS: &[&str] = &["slug", "id", "_id"];

/// Read time shown when a post does not carry one
pub const DEFAULT_READ_TIME: &str = "5 min read";

/// Kind of post, controlling the badge shown on cards
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostType {
    /// Regular article
    Blog,
    /// Company news, badged separately from articles
    CompanyUpdate,
    /// Any other value sent by the backend
    Other(String),
}

impl PostType {
    /// Parse the backend's `post_type` string
    pub fn from_label(label: &str) -> Self {
        match label {
            "blog" => PostType::Blog,
            "company-update" => PostType::CompanyUpdate,
            other => PostType::Other(other.to_string()),
        }
    }

    /// The backend's string for this post type
    pub fn as_label(&self) -> &str {
        match self {
            PostType::Blog => "blog",
            PostType::CompanyUpdate => "company-update",
            PostType::Other(label) => label,
        }
    }
}

/// A published content item (blog post or company update)
///
/// Never mutated by the sanitizer or the ranker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentItem {
    /// Unique, opaque key (slug, falling back to id); drafts may have none
    pub identifier: Option<String>,
    /// Optional category, compared case-insensitively
    pub category: Option<String>,
    /// Tags in author order, compared case-insensitively
    pub tags: Vec<String>,
    /// Short summary for cards
    pub excerpt: String,
    /// Untrusted HTML body
    pub raw_content: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub published_date: Option<String>,
    pub image: Option<String>,
    pub read_time: Option<String>,
    /// Absent when the backend did not tag the post
    pub post_type: Option<PostType>,
}

impl ContentItem {
    /// Create an item with only an identifier set
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: Some(identifier.into()),
            ..Default::default()
        }
    }

    /// Set the category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the tags
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Build an item from one JSON object of the listing payload
    ///
    /// The identifier is the first of `slug`, `id`, `_id` that is a non-empty
    /// string or a number, and is absent when none is.
    ///
    /// # Errors
    ///
    /// - `ContentError::InvalidInput`: The value is not a JSON object
    pub fn from_json(value: &Value) -> Result<Self, ContentError> {
        let object = value.as_object().ok_or_else(|| {
            ContentError::InvalidInput(format!("content item must be an object, got {}", kind(value)))
        })?;

        let identifier = IDENTIFIER_FIELDS
            .iter()
            .find_map(|field| identifier_field(object, field));

        Ok(Self {
            identifier,
            category: string_field(object, "category"),
            tags: string_list_field(object, "tags"),
            excerpt: string_field(object, "excerpt").unwrap_or_default(),
            raw_content: string_field(object, "content").unwrap_or_default(),
            title: string_field(object, "title"),
            author: string_field(object, "author"),
            published_date: string_field(object, "published_date")
                .or_else(|| string_field(object, "date")),
            image: string_field(object, "image"),
            read_time: string_field(object, "readTime")
                .or_else(|| string_field(object, "read_time")),
            post_type: string_field(object, "post_type")
                .map(|label| PostType::from_label(&label)),
        })
    }

    /// The markup to render for this item: its content, else its excerpt
    pub fn body(&self) -> &str {
        if self.raw_content.is_empty() {
            &self.excerpt
        } else {
            &self.raw_content
        }
    }

    /// Whether this item is a company update
    pub fn is_company_update(&self) -> bool {
        self.post_type == Some(PostType::CompanyUpdate)
    }

    /// Label for related-post cards: `Update`, the category, or `Article`
    pub fn card_label(&self) -> &str {
        if self.is_company_update() {
            "Update"
        } else {
            self.category_or_article()
        }
    }

    /// Label for the detail-page badge: `Company Update`, the category, or `Article`
    pub fn badge_label(&self) -> &str {
        if self.is_company_update() {
            "Company Update"
        } else {
            self.category_or_article()
        }
    }

    fn category_or_article(&self) -> &str {
        match self.category.as_deref() {
            Some(category) if !category.is_empty() => category,
            _ => "Article",
        }
    }

    /// The stored read time, or the site-wide default
    pub fn read_time_label(&self) -> &str {
        match self.read_time.as_deref() {
            Some(read_time) if !read_time.is_empty() => read_time,
            _ => DEFAULT_READ_TIME,
        }
    }
}

/// Build items from a listing payload
///
/// A payload that is not a JSON array yields no items. Entries that are not
/// objects are skipped.
pub fn items_from_json(payload: &Value) -> Vec<ContentItem> {
    let Some(entries) = payload.as_array() else {
        tracing::debug!(kind = kind(payload), "listing payload is not an array");
        return Vec::new();
    };

    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| match ContentItem::from_json(entry) {
            Ok(item) => Some(item),
            Err(err) => {
                tracing::debug!(index, error = %err, "skipping non-object content item");
                None
            }
        })
        .collect()
}

fn identifier_field(object: &Map<String, Value>, field: &str) -> Option<String> {
    match object.get(field)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn string_field(object: &Map<String, Value>, field: &str) -> Option<String> {
    object.get(field)?.as_str().map(str::to_string)
}

fn string_list_field(object: &Map<String, Value>, field: &str) -> Vec<String> {
    object
        .get(field)
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
