//! Listing helpers for the blog index and post cards
//!
//! Pure functions over a fetched listing: search and filters for the index
//! page, the category menu, card excerpts and published dates.

use chrono::{DateTime, NaiveDate};

use crate::content::{ContentItem, PostType};

/// Category entry that disables category filtering
pub const ALL_CATEGORIES: &str = "All";

/// Post-type value that disables post-type filtering
pub const ALL_POST_TYPES: &str = "all";

/// Characters kept when truncating card excerpts
pub const DEFAULT_EXCERPT_LENGTH: usize = 100;

/// Filters applied to the blog index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingFilter {
    /// Case-insensitive search over title and excerpt
    pub query: String,
    /// Exact category, or `None` / `"All"` for every category
    pub category: Option<String>,
    /// Post type label (`blog`, `company-update`), or `None` / `"all"`.
    /// Posts the backend sent without a post type match only `None` / `"all"`.
    pub post_type: Option<String>,
}

impl ListingFilter {
    fn matches(&self, item: &ContentItem, query: &str) -> bool {
        let matches_search = query.is_empty()
            || item
                .title
                .as_deref()
                .is_some_and(|title| title.to_lowercase().contains(query))
            || item.excerpt.to_lowercase().contains(query);

        let matches_category = match self.category.as_deref() {
            None | Some(ALL_CATEGORIES) => true,
            Some(category) => item.category.as_deref() == Some(category),
        };

        let matches_type = match self.post_type.as_deref() {
            None | Some(ALL_POST_TYPES) => true,
            Some(label) => item.post_type == Some(PostType::from_label(label)),
        };

        matches_search && matches_category && matches_type
    }
}

/// Items of the listing matching every filter, in listing order
pub fn filter_listing<'a>(items: &'a [ContentItem], filter: &ListingFilter) -> Vec<&'a ContentItem> {
    let query = filter.query.to_lowercase();
    items
        .iter()
        .filter(|item| filter.matches(item, &query))
        .collect()
}

/// Category menu entries: `All`, then each distinct category in listing order
pub fn listing_categories(items: &[ContentItem]) -> Vec<String> {
    let mut categories = vec![ALL_CATEGORIES.to_string()];
    for category in items.iter().filter_map(|item| item.category.as_deref()) {
        if !categories.iter().any(|known| known == category) {
            categories.push(category.to_string());
        }
    }
    categories
}

/// Shorten an excerpt for a card
///
/// Text up to `max_chars` characters is returned unchanged. Longer text is cut
/// at `max_chars` characters, trailing whitespace is trimmed, and `...` is
/// appended.
///
/// # Examples
///
/// ```rust
/// use site_content_core::listing::truncate_excerpt;
///
/// assert_eq!(truncate_excerpt("Short", 100), "Short");
/// assert_eq!(truncate_excerpt("Cloud migration best practices", 6), "Cloud...");
/// assert_eq!(truncate_excerpt("", 10), "");
/// ```
pub fn truncate_excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}...", text[..cut].trim()),
    }
}

/// Format a published date the way the site shows it: `January 15, 2025`
///
/// Accepts an RFC 3339 timestamp or a plain `YYYY-MM-DD` date. Returns `None`
/// when the value is neither.
///
/// # Examples
///
/// ```rust
/// use site_content_core::listing::format_published_date;
///
/// assert_eq!(format_published_date("2025-01-15").as_deref(), Some("January 15, 2025"));
/// assert_eq!(
///     format_published_date("2024-12-28T09:30:00Z").as_deref(),
///     Some("December 28, 2024")
/// );
/// assert_eq!(format_published_date("last week"), None);
/// ```
pub fn format_published_date(value: &str) -> Option<String> {
    let value = value.trim();
    let date = DateTime::parse_from_rfc3339(value)
        .map(|timestamp| timestamp.date_naive())
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d"))
        .ok()?;

    Some(date.format("%B %-d, %Y").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing() -> Vec<ContentItem> {
        let mut ai = ContentItem::new("ai-trends").with_category("AI & Innovation");
        ai.title = Some("The Future of Enterprise AI".to_string());
        ai.excerpt = "Explore how artificial intelligence is changing operations.".to_string();

        let mut zero_trust = ContentItem::new("zero-trust").with_category("Cybersecurity");
        zero_trust.title = Some("Zero Trust Security".to_string());
        zero_trust.excerpt = "Why zero trust architecture matters.".to_string();
        zero_trust.post_type = Some(PostType::Blog);

        let mut office = ContentItem::new("new-office").with_category("Cybersecurity");
        office.title = Some("We opened a new office".to_string());
        office.post_type = Some(PostType::CompanyUpdate);

        let mut untitled = ContentItem::new("untitled");
        untitled.excerpt = "An AI note without a title.".to_string();

        vec![ai, zero_trust, office, untitled]
    }

    fn ids(items: Vec<&ContentItem>) -> Vec<&str> {
        items
            .into_iter()
            .filter_map(|i| i.identifier.as_deref())
            .collect()
    }

    #[test]
    fn test_default_filter_matches_everything() {
        let items = listing();
        assert_eq!(filter_listing(&items, &ListingFilter::default()).len(), 4);
    }

    #[test]
    fn test_search_title_and_excerpt() {
        let items = listing();
        let filter = ListingFilter {
            query: "ai".to_string(),
            ..Default::default()
        };
        assert_eq!(ids(filter_listing(&items, &filter)), vec!["ai-trends", "untitled"]);

        let filter = ListingFilter {
            query: "ZERO".to_string(),
            ..Default::default()
        };
        assert_eq!(ids(filter_listing(&items, &filter)), vec!["zero-trust"]);
    }

    #[test]
    fn test_category_and_type_filters() {
        let items = listing();

        let filter = ListingFilter {
            category: Some("Cybersecurity".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(filter_listing(&items, &filter)), vec!["zero-trust", "new-office"]);

        let filter = ListingFilter {
            category: Some("Cybersecurity".to_string()),
            post_type: Some("company-update".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(filter_listing(&items, &filter)), vec!["new-office"]);

        let filter = ListingFilter {
            category: Some(ALL_CATEGORIES.to_string()),
            post_type: Some(ALL_POST_TYPES.to_string()),
            ..Default::default()
        };
        assert_eq!(filter_listing(&items, &filter).len(), 4);
    }

    #[test]
    fn test_type_filter_skips_posts_without_type() {
        let items = listing();
        let filter = ListingFilter {
            post_type: Some("blog".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(filter_listing(&items, &filter)), vec!["zero-trust"]);
    }

    #[test]
    fn test_category_filter_is_exact() {
        let items = listing();
        let filter = ListingFilter {
            category: Some("cybersecurity".to_string()),
            ..Default::default()
        };
        assert!(filter_listing(&items, &filter).is_empty());
    }

    #[test]
    fn test_listing_categories() {
        assert_eq!(
            listing_categories(&listing()),
            vec!["All", "AI & Innovation", "Cybersecurity"]
        );
        assert_eq!(listing_categories(&[]), vec!["All"]);
    }

    #[test]
    fn test_truncate_excerpt() {
        let long = "a".repeat(150);
        let truncated = truncate_excerpt(&long, DEFAULT_EXCERPT_LENGTH);
        assert_eq!(truncated.len(), 103);
        assert!(truncated.ends_with("..."));

        let exact = "b".repeat(100);
        assert_eq!(truncate_excerpt(&exact, DEFAULT_EXCERPT_LENGTH), exact);

        assert_eq!(truncate_excerpt("word   and more", 7), "word...");
    }

    #[test]
    fn test_truncate_excerpt_counts_characters() {
        assert_eq!(truncate_excerpt("héllo wörld", 5), "héllo...");
        assert_eq!(truncate_excerpt("日本語のテキスト", 3), "日本語...");
    }

    #[test]
    fn test_format_published_date() {
        assert_eq!(
            format_published_date("2025-01-05").as_deref(),
            Some("January 5, 2025")
        );
        assert_eq!(
            format_published_date("2025-03-01T23:30:00+02:00").as_deref(),
            Some("March 1, 2025")
        );
        assert_eq!(format_published_date(""), None);
        assert_eq!(format_published_date("2025-13-40"), None);
    }
}
