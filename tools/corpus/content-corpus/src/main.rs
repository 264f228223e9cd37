//! Run a blog listing export through the content pipeline
//!
//! Reads a JSON array of posts as served by the content-listing service and
//! prints one JSON line per post with its sanitized body and related posts.
//! Useful for checking a real export before it goes live.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde_json::{Value, json};
use site_content_core::{ContentSanitizer, RelatedContentRanker, items_from_json};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "content-corpus")]
#[command(version)]
#[command(about = "Sanitize and rank a blog listing export", long_about = None)]
struct Cli {
    /// JSON file holding an array of posts
    file: PathBuf,

    /// Only process the post with this identifier
    #[arg(short, long)]
    slug: Option<String>,

    /// Maximum number of related posts per post
    #[arg(short, long, default_value_t = 3)]
    limit: usize,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        "content_corpus=debug,site_content_core=debug,info"
    } else {
        "content_corpus=info,warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let raw = fs::read_to_string(&cli.file)
        .with_context(|| format!("failed to read {}", cli.file.display()))?;
    let payload: Value = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not valid JSON", cli.file.display()))?;
    if !payload.is_array() {
        bail!("{} must contain a JSON array of posts", cli.file.display());
    }

    let items = items_from_json(&payload);
    tracing::info!(posts = items.len(), file = %cli.file.display(), "loaded listing");

    let selected: Vec<_> = match cli.slug.as_deref() {
        Some(slug) => {
            let found: Vec<_> = items
                .iter()
                .filter(|item| item.identifier.as_deref() == Some(slug))
                .collect();
            if found.is_empty() {
                bail!("no post with identifier {slug:?}");
            }
            found
        }
        None => items.iter().collect(),
    };

    let sanitizer = ContentSanitizer::new();
    let ranker = RelatedContentRanker::with_limit(cli.limit);

    for item in selected {
        let html = sanitizer.sanitize_item(item);
        let related: Vec<Option<&str>> = ranker
            .rank(&items, Some(item))
            .into_iter()
            .map(|related| related.identifier.as_deref())
            .collect();

        tracing::debug!(
            slug = item.identifier.as_deref().unwrap_or("<none>"),
            input_bytes = item.body().len(),
            output_bytes = html.len(),
            related = related.len(),
            "processed post"
        );

        let line = json!({
            "slug": item.identifier,
            "label": item.badge_label(),
            "html": html,
            "related": related,
        });
        println!("{line}");
    }

    Ok(())
}
