//! # pagefeed
//!
//! Synthesizes an RSS 2.0 feed (with the Media RSS image extension) from a
//! web page that exposes no native feed.
//!
//! ## Features
//!
//! - Discovers article links on a listing page, deduplicated by canonical
//!   path with first-seen order preserved
//! - Extracts title, description, and preview image per article via
//!   ordered fallback chains over meta tags and page content
//! - Resolves publication dates through a four-tier chain: published-time
//!   meta tag, `<time>` element, JSON-LD structured data, and finally the
//!   `Last-Modified` response header
//! - Ranks items newest first (undated items last) and caps the feed size
//! - Writes a fixed-shape RSS document with image enclosures
//!
//! ## Usage
//!
//! ```sh
//! pagefeed https://sammen.no/no/artikkel --out public/rss.xml
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Discovery**: Fetch the listing page and collect article links
//! 2. **Extraction**: Visit each article sequentially (with a politeness
//!    delay) and build feed items; failed articles are skipped
//! 3. **Assembly**: Sort by recency and truncate to the configured cap
//! 4. **Output**: Serialize to RSS XML and write the file

use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};
use url::Url;

mod cli;
mod fetch;
mod models;
mod outputs;
mod scrape;
mod utils;

use cli::Cli;
use fetch::Fetcher;
use outputs::rss;
use scrape::{article, listing};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("pagefeed starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let list_url = Url::parse(&args.list_url)?;
    let base = match &args.base {
        Some(base) => Url::parse(base)?,
        None => {
            let mut origin = list_url.clone();
            origin.set_path("/");
            origin.set_query(None);
            origin.set_fragment(None);
            origin
        }
    };
    let prefix = match &args.path_prefix {
        Some(prefix) => prefix.clone(),
        None => {
            let path = list_url.path();
            if path.ends_with('/') {
                path.to_string()
            } else {
                format!("{path}/")
            }
        }
    };
    info!(%base, %prefix, "Resolved scrape scope");

    let fetcher = Fetcher::new(
        &args.user_agent,
        &args.lang,
        Duration::from_secs(args.timeout_secs),
    )?;

    // A listing fetch failure is the one fatal error of a run.
    let listing_html = fetcher.get_text(list_url.as_str()).await?;
    let links = listing::discover_links(&listing_html, &base, &prefix);

    let items = article::fetch_items(
        &fetcher,
        links,
        &base,
        args.default_image.as_deref(),
        Duration::from_millis(args.delay_ms),
    )
    .await;

    let items = rss::assemble(items, args.max_items);
    let xml = rss::render(&items, list_url.as_str(), args.refresh_minutes)?;
    rss::write_feed(&xml, &args.out).await?;

    let elapsed = start_time.elapsed();
    info!(
        items = items.len(),
        path = %args.out,
        ?elapsed,
        "Feed written"
    );

    Ok(())
}
