//! Related-content ranking
//!
//! Picks the few items most topically related to the one being read, using
//! only category and tag overlap:
//!
//! ```text
//! score = (same category ? 1 : 0) + |distinct shared tags|
//! ```
//!
//! Comparisons are case-insensitive. An absent category never matches, not
//! even another absent category. Items scoring zero are not related and are
//! dropped. Survivors are ordered by descending score; equal scores keep their
//! order from the input collection, so the result is reproducible for the
//! same listing.
//!
//! # Examples
//!
//! ```rust
//! use site_content_core::content::ContentItem;
//! use site_content_core::ranker::rank_related;
//!
//! let current = ContentItem::new("A").with_category("Tech").with_tags(["ai", "cloud"]);
//! let all = vec![
//!     ContentItem::new("B").with_category("Tech"),
//!     ContentItem::new("C").with_category("Biz").with_tags(["ai"]),
//!     ContentItem::new("D").with_category("Tech").with_tags(["ai", "cloud"]),
//!     ContentItem::new("E").with_category("Biz").with_tags(["biz"]),
//! ];
//!
//! let related: Vec<&str> = rank_related(&all, Some(&current), 3)
//!     .iter()
//!     .filter_map(|item| item.identifier.as_deref())
//!     .collect();
//! assert_eq!(related, vec!["D", "B", "C"]);
//! ```

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;

use crate::content::{ContentItem, items_from_json};

/// Number of related items shown under a post
pub const DEFAULT_RELATED_LIMIT: usize = 3;

/// Ranker configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RankerOptions {
    /// Maximum number of related items returned
    pub limit: usize,
}

impl Default for RankerOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_RELATED_LIMIT,
        }
    }
}

/// Scores and selects related content items
#[derive(Debug, Clone, Copy)]
pub struct RelatedContentRanker {
    limit: usize,
}

impl RelatedContentRanker {
    /// Create a ranker returning at most three items
    pub fn new() -> Self {
        Self::with_options(RankerOptions::default())
    }

    /// Create a ranker with a custom result limit
    pub fn with_limit(limit: usize) -> Self {
        Self { limit }
    }

    /// Create a ranker from options
    pub fn with_options(options: RankerOptions) -> Self {
        Self::with_limit(options.limit)
    }

    /// Maximum number of items returned
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Relevance of `candidate` to `current`
    ///
    /// # Examples
    ///
    /// ```rust
    /// use site_content_core::content::ContentItem;
    /// use site_content_core::ranker::RelatedContentRanker;
    ///
    /// let current = ContentItem::new("a").with_category("Cloud").with_tags(["AWS", "k8s"]);
    /// let candidate = ContentItem::new("b").with_category("cloud").with_tags(["aws", "AWS"]);
    /// assert_eq!(RelatedContentRanker::score(&candidate, &current), 2);
    /// ```
    pub fn score(candidate: &ContentItem, current: &ContentItem) -> usize {
        TopicKey::new(current).score(candidate)
    }

    /// Select the items most related to `current`
    ///
    /// Returns an empty list when `current` is absent. Candidates whose
    /// identifier equals the current item's are excluded; an item without an
    /// identifier is treated as sharing the absent identifier of a current
    /// item that also lacks one.
    pub fn rank<'a>(
        &self,
        all_items: &'a [ContentItem],
        current: Option<&ContentItem>,
    ) -> Vec<&'a ContentItem> {
        let Some(current) = current else {
            return Vec::new();
        };
        if self.limit == 0 {
            return Vec::new();
        }

        let key = TopicKey::new(current);
        let mut scored: Vec<(usize, &ContentItem)> = all_items
            .iter()
            .filter(|item| item.identifier != current.identifier)
            .map(|item| (key.score(item), item))
            .filter(|(score, _)| *score > 0)
            .collect();

        // Stable: equal scores keep listing order
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        scored
            .into_iter()
            .take(self.limit)
            .map(|(_, item)| item)
            .collect()
    }

    /// Rank straight from JSON payloads
    ///
    /// A collection that is not an array, or a current item that is not a
    /// JSON object, yields an empty list.
    pub fn rank_json(&self, all_items: &Value, current: &Value) -> Vec<ContentItem> {
        if !all_items.is_array() {
            tracing::debug!("related-content collection is not an array");
            return Vec::new();
        }

        let current = match ContentItem::from_json(current) {
            Ok(current) => current,
            Err(err) => {
                tracing::debug!(error = %err, "current item for related content is not an object");
                return Vec::new();
            }
        };

        let items = items_from_json(all_items);
        self.rank(&items, Some(&current))
            .into_iter()
            .cloned()
            .collect()
    }
}

impl Default for RelatedContentRanker {
    fn default() -> Self {
        Self::new()
    }
}

/// Case-folded category and tag set of the current item
struct TopicKey {
    category: Option<String>,
    tags: HashSet<String>,
}

impl TopicKey {
    fn new(item: &ContentItem) -> Self {
        Self {
            category: item.category.as_deref().map(str::to_lowercase),
            tags: item.tags.iter().map(|tag| tag.to_lowercase()).collect(),
        }
    }

    fn score(&self, candidate: &ContentItem) -> usize {
        let same_category = match (&self.category, &candidate.category) {
            (Some(current), Some(other)) => *current == other.to_lowercase(),
            _ => false,
        };

        let candidate_tags: HashSet<String> =
            candidate.tags.iter().map(|tag| tag.to_lowercase()).collect();
        let shared_tags = candidate_tags.intersection(&self.tags).count();

        usize::from(same_category) + shared_tags
    }
}

/// Select up to `limit` items related to `current`
pub fn rank_related<'a>(
    all_items: &'a [ContentItem],
    current: Option<&ContentItem>,
    limit: usize,
) -> Vec<&'a ContentItem> {
    RelatedContentRanker::with_limit(limit).rank(all_items, current)
}

/// Select up to `limit` related items from JSON payloads
pub fn rank_related_json(all_items: &Value, current: &Value, limit: usize) -> Vec<ContentItem> {
    RelatedContentRanker::with_limit(limit).rank_json(all_items, current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn ids<'a>(items: impl IntoIterator<Item = &'a ContentItem>) -> Vec<&'a str> {
        items
            .into_iter()
            .map(|i| i.identifier.as_deref().unwrap_or("-"))
            .collect()
    }

    fn scenario() -> (ContentItem, Vec<ContentItem>) {
        let current = ContentItem::new("A")
            .with_category("Tech")
            .with_tags(["ai", "cloud"]);
        let all = vec![
            current.clone(),
            ContentItem::new("B").with_category("Tech"),
            ContentItem::new("C").with_category("Biz").with_tags(["ai"]),
            ContentItem::new("D")
                .with_category("Tech")
                .with_tags(["ai", "cloud"]),
            ContentItem::new("E").with_category("Biz").with_tags(["biz"]),
        ];
        (current, all)
    }

    #[test]
    fn test_concrete_scenario() {
        let (current, all) = scenario();
        let related = rank_related(&all, Some(&current), DEFAULT_RELATED_LIMIT);
        assert_eq!(ids(related), vec!["D", "B", "C"]);
    }

    #[test]
    fn test_absent_current_item() {
        let (_, all) = scenario();
        assert!(rank_related(&all, None, 3).is_empty());
    }

    #[test]
    fn test_empty_collection() {
        let (current, _) = scenario();
        assert!(rank_related(&[], Some(&current), 3).is_empty());
    }

    #[test]
    fn test_limit_is_respected() {
        let (current, all) = scenario();
        assert_eq!(ids(rank_related(&all, Some(&current), 1)), vec!["D"]);
        assert!(rank_related(&all, Some(&current), 0).is_empty());
        assert_eq!(rank_related(&all, Some(&current), 10).len(), 3);
    }

    #[test]
    fn test_category_comparison_ignores_case() {
        let current = ContentItem::new("a").with_category("Cloud Computing");
        let candidate = ContentItem::new("b").with_category("cloud computing");
        assert_eq!(RelatedContentRanker::score(&candidate, &current), 1);
    }

    #[test]
    fn test_absent_categories_never_match() {
        let current = ContentItem::new("a");
        let candidate = ContentItem::new("b");
        assert_eq!(RelatedContentRanker::score(&candidate, &current), 0);
        assert!(rank_related(std::slice::from_ref(&candidate), Some(&current), 3).is_empty());
    }

    #[test]
    fn test_shared_tags_count_once() {
        let current = ContentItem::new("a").with_tags(["AI", "ai", "cloud"]);
        let candidate = ContentItem::new("b").with_tags(["Ai", "aI", "AI", "devops"]);
        assert_eq!(RelatedContentRanker::score(&candidate, &current), 1);
    }

    #[test]
    fn test_current_item_excluded_by_identifier() {
        let current = ContentItem::new("same").with_category("Tech");
        // A different object with the same identifier is still the current item
        let duplicate = ContentItem::new("same").with_category("Tech").with_tags(["x"]);
        let other = ContentItem::new("other").with_category("Tech");

        let all = vec![duplicate, other];
        assert_eq!(ids(rank_related(&all, Some(&current), 3)), vec!["other"]);
    }

    #[test]
    fn test_ties_keep_listing_order() {
        let current = ContentItem::new("x").with_category("News");
        let all: Vec<ContentItem> = ["n1", "n2", "n3", "n4"]
            .iter()
            .map(|id| ContentItem::new(*id).with_category("news"))
            .collect();

        assert_eq!(
            ids(rank_related(&all, Some(&current), 3)),
            vec!["n1", "n2", "n3"]
        );
    }

    #[test]
    fn test_rank_json_non_array_collection() {
        let current = json!({"slug": "A", "category": "Tech"});
        assert!(rank_related_json(&json!({"slug": "B"}), &current, 3).is_empty());
        assert!(rank_related_json(&Value::Null, &current, 3).is_empty());
        assert!(rank_related_json(&json!("posts"), &current, 3).is_empty());
    }

    #[test]
    fn test_rank_json_absent_current() {
        let all = json!([{"slug": "B", "category": "Tech"}]);
        assert!(rank_related_json(&all, &Value::Null, 3).is_empty());
        assert!(rank_related_json(&all, &json!(["Tech"]), 3).is_empty());
    }

    #[test]
    fn test_candidates_without_identifier_are_ranked() {
        let all = json!([
            {"title": "Draft", "category": "Tech"},
            {"slug": "B", "category": "Tech"},
        ]);
        let current = json!({"slug": "A", "category": "tech"});

        let related = rank_related_json(&all, &current, 3);
        assert_eq!(ids(&related), vec!["-", "B"]);
        assert_eq!(related[0].title.as_deref(), Some("Draft"));
    }

    #[test]
    fn test_current_item_without_identifier() {
        let all = json!([
            {"title": "Draft", "category": "Tech"},
            {"slug": "B", "category": "Tech"},
            {"slug": "C", "tags": ["ai"]},
        ]);
        let current = json!({"category": "Tech", "tags": ["AI"]});

        // The other identifier-less item is indistinguishable from the current one
        let related = rank_related_json(&all, &current, 3);
        assert_eq!(ids(&related), vec!["B", "C"]);
    }

    #[test]
    fn test_rank_json_malformed_fields() {
        let all = json!([
            {"slug": "B", "category": "Tech", "tags": null},
            {"slug": "C", "category": null, "tags": ["AI", 3]},
            {"slug": "D"},
            7,
            {"id": null, "category": "TECH"},
        ]);
        let current = json!({"slug": "A", "category": "tech", "tags": ["ai"]});

        let related = rank_related_json(&all, &current, 3);
        assert_eq!(ids(&related), vec!["B", "C", "-"]);
    }

    #[test]
    fn test_options_deserialize() {
        let options: RankerOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options.limit, 3);
        let options: RankerOptions = serde_json::from_str(r#"{"limit": 6}"#).unwrap();
        assert_eq!(RelatedContentRanker::with_options(options).limit(), 6);
    }

    fn item_strategy() -> impl Strategy<Value = ContentItem> {
        (
            "[a-f]",
            prop::option::of(prop::sample::select(vec!["Tech", "tech", "Biz", "Cloud"])),
            prop::collection::vec(prop::sample::select(vec!["ai", "AI", "cloud", "biz", "ops"]), 0..4),
        )
            .prop_map(|(id, category, tags)| {
                let mut item = ContentItem::new(id).with_tags(tags);
                item.category = category.map(str::to_string);
                item
            })
    }

    proptest! {
        #[test]
        fn prop_ranking_invariants(
            all in prop::collection::vec(item_strategy(), 0..12),
            current in item_strategy(),
            limit in 0usize..6,
        ) {
            let related = rank_related(&all, Some(&current), limit);

            prop_assert!(related.len() <= limit);
            for item in &related {
                prop_assert_ne!(&item.identifier, &current.identifier);
                prop_assert!(RelatedContentRanker::score(item, &current) > 0);
            }

            // Scores never increase along the list
            let scores: Vec<usize> = related
                .iter()
                .map(|item| RelatedContentRanker::score(item, &current))
                .collect();
            prop_assert!(scores.windows(2).all(|w| w[0] >= w[1]));

            // Deterministic across calls
            let again = rank_related(&all, Some(&current), limit);
            prop_assert_eq!(related, again);
        }
    }
}
