//! Publication-date resolution with a four-tier fallback chain.
//!
//! Publication dates are the least consistently published piece of article
//! metadata, so four sources are tried in strict order, each only when the
//! previous one yielded nothing:
//!
//! 1. `<meta property="article:published_time">` content (ISO 8601)
//! 2. `<time datetime="...">` machine-readable attribute (ISO 8601)
//! 3. JSON-LD structured data blocks, searched recursively for a
//!    `datePublished` field
//! 4. The `Last-Modified` header of a HEAD request to the article URL
//!
//! Tiers 1-3 read the already-parsed document ([`date_from_document`]);
//! tier 4 needs the network ([`date_from_headers`]) and is invoked by the
//! article extractor only when the document yielded nothing. All parse
//! failures are swallowed: an unresolvable date is a valid outcome, not an
//! error.

use crate::fetch::Fetcher;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use reqwest::header::LAST_MODIFIED;
use scraper::{Html, Selector};
use serde_json::Value;
use tracing::{debug, instrument, trace};

static META_PUBLISHED: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[property="article:published_time"]"#).unwrap());
static TIME_DATETIME: Lazy<Selector> = Lazy::new(|| Selector::parse("time[datetime]").unwrap());
static JSON_LD: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"script[type="application/ld+json"]"#).unwrap());

/// Parse an ISO 8601 timestamp, treating a trailing `Z` as UTC.
///
/// Accepts RFC 3339 timestamps with an offset, naive timestamps without
/// one (assumed UTC), and bare dates (assumed midnight UTC). Returns
/// `None` for anything else.
pub fn parse_iso_date(value: &str) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc().fixed_offset());
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc().fixed_offset());
    }
    None
}

/// Resolve a publication date from the document itself (tiers 1-3).
pub fn date_from_document(document: &Html) -> Option<DateTime<FixedOffset>> {
    date_from_meta(document)
        .or_else(|| date_from_time_element(document))
        .or_else(|| date_from_json_ld(document))
}

/// Tier 1: the `article:published_time` meta tag.
fn date_from_meta(document: &Html) -> Option<DateTime<FixedOffset>> {
    document
        .select(&META_PUBLISHED)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .and_then(parse_iso_date)
}

/// Tier 2: the first `<time>` element carrying a `datetime` attribute.
fn date_from_time_element(document: &Html) -> Option<DateTime<FixedOffset>> {
    document
        .select(&TIME_DATETIME)
        .next()
        .and_then(|time| time.value().attr("datetime"))
        .and_then(parse_iso_date)
}

/// Tier 3: JSON-LD blocks, searched recursively.
///
/// Each `script[type="application/ld+json"]` block is parsed as JSON;
/// blocks that fail to parse are skipped. The first block whose value
/// yields a date wins.
fn date_from_json_ld(document: &Html) -> Option<DateTime<FixedOffset>> {
    for script in document.select(&JSON_LD) {
        let text = script.text().collect::<String>();
        let value: Value = match serde_json::from_str(&text) {
            Ok(v) => v,
            Err(e) => {
                trace!(error = %e, "Skipping unparseable JSON-LD block");
                continue;
            }
        };
        if let Some(date) = search_date_published(&value) {
            return Some(date);
        }
    }
    None
}

/// Recursive descent over a JSON value looking for `datePublished`.
///
/// An object is checked for a direct `datePublished` field, then for one
/// nested inside an `article` or `mainEntityOfPage` object. An array is
/// searched element by element, first hit wins. Recursion is bounded by
/// the document's own nesting; parsed JSON cannot contain cycles.
fn search_date_published(value: &Value) -> Option<DateTime<FixedOffset>> {
    match value {
        Value::Object(object) => {
            if let Some(date) = object.get("datePublished") {
                return date.as_str().and_then(parse_iso_date);
            }
            for key in ["article", "mainEntityOfPage"] {
                if let Some(Value::Object(nested)) = object.get(key) {
                    if let Some(date) = nested
                        .get("datePublished")
                        .and_then(Value::as_str)
                        .filter(|s| !s.is_empty())
                    {
                        return parse_iso_date(date);
                    }
                }
            }
            None
        }
        Value::Array(entries) => entries.iter().find_map(search_date_published),
        _ => None,
    }
}

/// Tier 4: the `Last-Modified` header of a HEAD request, treated as UTC.
///
/// Transport errors are swallowed by the fetcher, so a missing or
/// malformed header simply yields `None`.
#[instrument(level = "debug", skip(fetcher))]
pub async fn date_from_headers(fetcher: &Fetcher, url: &str) -> Option<DateTime<FixedOffset>> {
    let headers = fetcher.get_head(url).await;
    let last_modified = headers.get(LAST_MODIFIED)?.to_str().ok()?;
    let parsed = DateTime::parse_from_rfc2822(last_modified).ok();
    debug!(last_modified, found = parsed.is_some(), "Last-Modified fallback");
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_iso_date_with_offset() {
        let dt = parse_iso_date("2025-05-06T10:30:00+02:00").unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-05-06T10:30:00+02:00");
    }

    #[test]
    fn test_parse_iso_date_trailing_z_is_utc() {
        let dt = parse_iso_date("2025-05-06T10:30:00Z").unwrap();
        assert_eq!(dt.offset().local_minus_utc(), 0);
        assert_eq!(dt.to_rfc3339(), "2025-05-06T10:30:00+00:00");
    }

    #[test]
    fn test_parse_iso_date_naive_assumed_utc() {
        let dt = parse_iso_date("2025-05-06T10:30:00").unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-05-06T10:30:00+00:00");
    }

    #[test]
    fn test_parse_iso_date_bare_date() {
        let dt = parse_iso_date("2025-05-06").unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-05-06T00:00:00+00:00");
    }

    #[test]
    fn test_parse_iso_date_garbage() {
        assert!(parse_iso_date("").is_none());
        assert!(parse_iso_date("yesterday").is_none());
        assert!(parse_iso_date("06.05.2025").is_none());
    }

    #[test]
    fn test_meta_tag_wins_over_json_ld() {
        let html = r#"
            <head>
              <meta property="article:published_time" content="2025-05-06T08:00:00Z">
              <script type="application/ld+json">
                {"@type": "NewsArticle", "datePublished": "2020-01-01T00:00:00Z"}
              </script>
            </head>
        "#;
        let document = Html::parse_document(html);
        let dt = date_from_document(&document).unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-05-06T08:00:00+00:00");
    }

    #[test]
    fn test_time_element_wins_over_json_ld() {
        let html = r#"
            <body>
              <time datetime="2025-04-01T12:00:00+01:00">1. april</time>
              <script type="application/ld+json">
                {"datePublished": "2020-01-01T00:00:00Z"}
              </script>
            </body>
        "#;
        let document = Html::parse_document(html);
        let dt = date_from_document(&document).unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-04-01T12:00:00+01:00");
    }

    #[test]
    fn test_json_ld_direct_date() {
        let html = r#"
            <script type="application/ld+json">
              {"@type": "Article", "datePublished": "2025-03-10T09:15:00Z"}
            </script>
        "#;
        let document = Html::parse_document(html);
        let dt = date_from_document(&document).unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-03-10T09:15:00+00:00");
    }

    #[test]
    fn test_json_ld_nested_main_entity() {
        let html = r#"
            <script type="application/ld+json">
              {"mainEntityOfPage": {"datePublished": "2025-02-20T18:00:00Z"}}
            </script>
        "#;
        let document = Html::parse_document(html);
        let dt = date_from_document(&document).unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-02-20T18:00:00+00:00");
    }

    #[test]
    fn test_json_ld_top_level_array_first_hit_wins() {
        let html = r#"
            <script type="application/ld+json">
              [
                {"@type": "WebSite"},
                {"@type": "NewsArticle", "datePublished": "2025-01-15T07:00:00Z"},
                {"@type": "NewsArticle", "datePublished": "2024-01-01T00:00:00Z"}
              ]
            </script>
        "#;
        let document = Html::parse_document(html);
        let dt = date_from_document(&document).unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-01-15T07:00:00+00:00");
    }

    #[test]
    fn test_json_ld_malformed_block_is_skipped() {
        let html = r#"
            <script type="application/ld+json">{not json at all</script>
            <script type="application/ld+json">
              {"datePublished": "2025-06-01T00:00:00Z"}
            </script>
        "#;
        let document = Html::parse_document(html);
        let dt = date_from_document(&document).unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-06-01T00:00:00+00:00");
    }

    #[test]
    fn test_no_date_anywhere_in_document() {
        let html = "<html><body><h1>Tittel</h1><p>Tekst.</p></body></html>";
        let document = Html::parse_document(html);
        assert!(date_from_document(&document).is_none());
    }

    #[test]
    fn test_last_modified_parses_rfc2822() {
        let dt = DateTime::parse_from_rfc2822("Tue, 06 May 2025 10:30:00 GMT").unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-05-06T10:30:00+00:00");
    }
}
