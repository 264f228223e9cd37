//! Picking related posts for a blog detail page

use serde_json::json;
use site_content_core::{format_published_date, rank_related_json, truncate_excerpt};

fn main() {
    let posts = json!([
        {
            "slug": "enterprise-ai-roadmap",
            "title": "Building an Enterprise AI Roadmap",
            "category": "AI & Innovation",
            "tags": ["ai", "strategy"],
            "published_date": "2025-01-15"
        },
        {
            "slug": "ai-governance",
            "title": "AI Governance Basics",
            "excerpt": "Policies every team needs before shipping models to production environments across the company.",
            "category": "AI & Innovation",
            "tags": ["ai"],
            "published_date": "2025-02-02"
        },
        {
            "slug": "strategy-offsite",
            "title": "Our Strategy Offsite",
            "excerpt": "What we decided for next year.",
            "tags": ["Strategy"],
            "post_type": "company-update",
            "published_date": "2025-03-10T09:00:00Z"
        },
        {
            "slug": "zero-trust",
            "title": "Zero Trust in Practice",
            "category": "Cybersecurity",
            "tags": ["security"]
        }
    ]);

    let current = &posts[0];
    println!("Related to {}:\n", current["title"]);

    for post in rank_related_json(&posts, current, 3) {
        let date = post
            .published_date
            .as_deref()
            .and_then(format_published_date)
            .unwrap_or_default();
        println!(
            "[{}] {} ({date}, {})",
            post.card_label(),
            post.title
                .as_deref()
                .or(post.identifier.as_deref())
                .unwrap_or("Untitled"),
            post.read_time_label()
        );
        println!("    {}", truncate_excerpt(&post.excerpt, 60));
    }
}
