//! Per-article metadata extraction via ordered fallback chains.
//!
//! Every field is extracted by an explicit ordered list of extractor
//! functions; the first source that yields a non-empty value wins. The
//! chains mirror how article pages actually degrade in the wild:
//!
//! | Field       | Chain                                                      |
//! |-------------|------------------------------------------------------------|
//! | title       | `<h1>` → `og:title` → `<title>` → the URL itself           |
//! | description | `meta[name=description]` → `og:description` → first `<p>`  |
//! | image       | `og:image` (made absolute) → configured default → none     |
//! | pub_date    | delegated to [`crate::scrape::dates`]                      |
//!
//! A fetch failure for one article skips that article with a warning; it
//! never aborts the run.

use crate::fetch::Fetcher;
use crate::models::{ArticleItem, ArticleLink};
use crate::scrape::dates;
use crate::utils::{MAX_DESCRIPTION_LEN, clean_text, resolve_url, truncate};
use chrono::{DateTime, FixedOffset};
use futures::stream::{self, StreamExt};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};
use url::Url;

static H1: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").unwrap());
static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());
static OG_TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[property="og:title"]"#).unwrap());
static META_DESCRIPTION: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[name="description"]"#).unwrap());
static OG_DESCRIPTION: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[property="og:description"]"#).unwrap());
static OG_IMAGE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[property="og:image"]"#).unwrap());
static MAIN: Lazy<Selector> = Lazy::new(|| Selector::parse("main").unwrap());
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());

/// A single source in a fallback chain.
type Extractor = fn(&Html) -> Option<String>;

const TITLE_CHAIN: &[Extractor] = &[h1_text, og_title, document_title];
const DESCRIPTION_CHAIN: &[Extractor] = &[meta_description, og_description, first_paragraph];

/// Run a fallback chain, returning the first cleaned non-empty result.
fn first_non_empty(document: &Html, chain: &[Extractor]) -> Option<String> {
    chain.iter().find_map(|extract| {
        extract(document)
            .map(|text| clean_text(&text))
            .filter(|text| !text.is_empty())
    })
}

fn h1_text(document: &Html) -> Option<String> {
    document
        .select(&H1)
        .next()
        .map(|h1| h1.text().collect::<Vec<_>>().join(" "))
}

fn og_title(document: &Html) -> Option<String> {
    meta_content(document, &OG_TITLE)
}

fn document_title(document: &Html) -> Option<String> {
    document
        .select(&TITLE)
        .next()
        .map(|title| title.text().collect::<String>())
}

fn meta_description(document: &Html) -> Option<String> {
    meta_content(document, &META_DESCRIPTION)
}

fn og_description(document: &Html) -> Option<String> {
    meta_content(document, &OG_DESCRIPTION)
}

/// First paragraph inside `<main>`, or anywhere when there is no `<main>`.
fn first_paragraph(document: &Html) -> Option<String> {
    let paragraph = match document.select(&MAIN).next() {
        Some(main) => main.select(&PARAGRAPH).next(),
        None => document.select(&PARAGRAPH).next(),
    };
    paragraph.map(|p| p.text().collect::<Vec<_>>().join(" "))
}

fn meta_content(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .map(str::to_string)
}

/// Preview image: `og:image` resolved to absolute form, else the
/// configured default image, else none.
fn image_url(document: &Html, base: &Url, default_image: Option<&str>) -> Option<String> {
    meta_content(document, &OG_IMAGE)
        .map(|content| clean_text(&content))
        .filter(|content| !content.is_empty())
        .map(|content| resolve_url(base, &content).to_string())
        .or_else(|| default_image.map(str::to_string))
}

/// Extract all document-derived fields for one article page.
///
/// Returns `(title, description, image, pub_date)` where `pub_date` covers
/// the document tiers only; the HEAD-request tier is applied by the caller
/// once the document is no longer needed.
fn extract_metadata(
    document: &Html,
    url: &str,
    base: &Url,
    default_image: Option<&str>,
) -> (String, String, Option<String>, Option<DateTime<FixedOffset>>) {
    let title = first_non_empty(document, TITLE_CHAIN).unwrap_or_else(|| url.to_string());
    let description = truncate(
        &first_non_empty(document, DESCRIPTION_CHAIN).unwrap_or_default(),
        MAX_DESCRIPTION_LEN,
    );
    let image = image_url(document, base, default_image);
    let pub_date = dates::date_from_document(document);
    (title, description, image, pub_date)
}

/// Fetch one article page and build an [`ArticleItem`] from it.
///
/// Returns `None` when the fetch fails; the article is then simply absent
/// from the feed.
#[instrument(level = "info", skip_all, fields(url = %link.url))]
pub async fn build_item(
    fetcher: &Fetcher,
    link: &ArticleLink,
    base: &Url,
    default_image: Option<&str>,
) -> Option<ArticleItem> {
    let body = match fetcher.get_text(link.url.as_str()).await {
        Ok(body) => body,
        Err(e) => {
            warn!(error = %e, "Skipping article: fetch failed");
            return None;
        }
    };

    let url = link.url.to_string();
    // The parsed document is dropped before the HEAD fallback so no
    // document state is held across the await.
    let (title, description, image, document_date) = {
        let document = Html::parse_document(&body);
        extract_metadata(&document, &url, base, default_image)
    };

    let pub_date = match document_date {
        Some(date) => Some(date),
        None => dates::date_from_headers(fetcher, &url).await,
    };

    debug!(
        title = %title,
        has_image = image.is_some(),
        has_date = pub_date.is_some(),
        "Extracted article metadata"
    );

    Some(ArticleItem {
        title,
        link: url.clone(),
        description,
        image,
        pub_date,
        guid: url,
    })
}

/// Visit every discovered link in order and build feed items.
///
/// Articles are fetched strictly one at a time, with a fixed politeness
/// delay after each, so the source server never sees concurrent requests
/// from a run. Failed extractions are dropped.
#[instrument(level = "info", skip_all, fields(count = links.len()))]
pub async fn fetch_items(
    fetcher: &Fetcher,
    links: Vec<ArticleLink>,
    base: &Url,
    default_image: Option<&str>,
    delay: Duration,
) -> Vec<ArticleItem> {
    let items: Vec<ArticleItem> = stream::iter(links)
        .then(|link| async move {
            let item = build_item(fetcher, &link, base, default_image).await;
            sleep(delay).await;
            item
        })
        .filter_map(std::future::ready)
        .collect()
        .await;

    info!(count = items.len(), "Extracted article items");
    items
}
