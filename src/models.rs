//! Data models for discovered links and extracted feed items.
//!
//! This module defines the two core data structures that flow through the
//! pipeline:
//! - [`ArticleLink`]: A deduplicated article URL discovered on the listing page
//! - [`ArticleItem`]: A fully extracted article, ready for feed assembly
//!
//! Both types are built once and never mutated afterwards. An article whose
//! extraction fails produces no `ArticleItem` at all; the optional fields
//! below are the only permitted absences.

use chrono::{DateTime, FixedOffset};
use url::Url;

/// An article link discovered on the listing page.
///
/// Identity is the canonical URL path: two links that resolve to the same
/// path (differing only in query string or a trailing slash) are the same
/// article, and link discovery keeps only the first occurrence.
#[derive(Debug, Clone)]
pub struct ArticleLink {
    /// The absolute article URL.
    pub url: Url,
    /// The URL path, without any trailing slash, used for deduplication.
    pub canonical_path: String,
}

impl ArticleLink {
    /// Wrap an absolute URL, recording its path as the canonical identity.
    pub fn new(url: Url) -> Self {
        let path = url.path();
        let canonical_path = if path.len() > 1 {
            path.trim_end_matches('/').to_string()
        } else {
            path.to_string()
        };
        ArticleLink {
            url,
            canonical_path,
        }
    }
}

/// A fully extracted article, as it will appear in the feed.
///
/// # Fields
///
/// * `title` - Never empty; falls back to the article URL itself
/// * `link` - The absolute article URL
/// * `description` - Cleaned and truncated summary text, possibly empty
/// * `image` - Absolute image URL, when one was found or configured
/// * `pub_date` - Resolved publication timestamp, when any source yielded one
/// * `guid` - Feed item identifier, always equal to `link`
#[derive(Debug, Clone)]
pub struct ArticleItem {
    pub title: String,
    pub link: String,
    pub description: String,
    pub image: Option<String>,
    pub pub_date: Option<DateTime<FixedOffset>>,
    pub guid: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_link_canonical_path() {
        let url = Url::parse("https://example.org/no/artikkel/velkommen?ref=1").unwrap();
        let link = ArticleLink::new(url);
        assert_eq!(link.canonical_path, "/no/artikkel/velkommen");
        assert_eq!(
            link.url.as_str(),
            "https://example.org/no/artikkel/velkommen?ref=1"
        );
    }

    #[test]
    fn test_article_link_query_does_not_change_identity() {
        let a = ArticleLink::new(Url::parse("https://example.org/a").unwrap());
        let b = ArticleLink::new(Url::parse("https://example.org/a?utm_source=x").unwrap());
        assert_eq!(a.canonical_path, b.canonical_path);
    }

    #[test]
    fn test_article_link_trailing_slash_does_not_change_identity() {
        let a = ArticleLink::new(Url::parse("https://example.org/no/artikkel/a").unwrap());
        let b = ArticleLink::new(Url::parse("https://example.org/no/artikkel/a/").unwrap());
        assert_eq!(a.canonical_path, b.canonical_path);
    }
}
