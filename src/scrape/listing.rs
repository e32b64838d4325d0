//! Article link discovery on the listing page.
//!
//! Scans anchor elements within the listing page's `<main>` region (the
//! whole document when no `<main>` exists), keeps links under the
//! configured path prefix, and deduplicates them by canonical path while
//! preserving first-seen order.

use crate::models::ArticleLink;
use crate::utils::resolve_url;
use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument};
use url::Url;

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());
static MAIN: Lazy<Selector> = Lazy::new(|| Selector::parse("main").unwrap());

/// Discover article links on a listing page.
///
/// Anchors are considered when their `href` mentions `prefix`; each is
/// resolved to an absolute URL against `base` and kept when its path
/// starts with `prefix` but is not the bare prefix itself (which would be
/// the index page). Duplicates by canonical path keep only the first
/// occurrence.
///
/// Empty or malformed markup yields an empty vector, never an error.
#[instrument(level = "info", skip(html))]
pub fn discover_links(html: &str, base: &Url, prefix: &str) -> Vec<ArticleLink> {
    let document = Html::parse_document(html);
    let anchors: Vec<ElementRef> = match document.select(&MAIN).next() {
        Some(main) => main.select(&ANCHOR).collect(),
        None => document.select(&ANCHOR).collect(),
    };

    let index_path = prefix.trim_matches('/');
    let links: Vec<ArticleLink> = anchors
        .into_iter()
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| href.contains(prefix))
        .map(|href| resolve_url(base, href))
        .filter(|url| {
            let path = url.path();
            path.starts_with(prefix) && path.trim_matches('/') != index_path
        })
        .map(ArticleLink::new)
        .unique_by(|link| link.canonical_path.clone())
        .collect();

    info!(count = links.len(), "Discovered article links");
    debug!(paths = ?links.iter().map(|l| l.canonical_path.as_str()).collect::<Vec<_>>(), "Link paths");

    links
}
