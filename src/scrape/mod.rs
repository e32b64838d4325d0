//! Scraping pipeline: link discovery and per-article metadata extraction.
//!
//! The pipeline runs in two phases, mirroring the overall control flow:
//!
//! 1. **Discovery** ([`listing`]): Parse the listing page and collect the
//!    article links under the configured path prefix, deduplicated by
//!    canonical path.
//! 2. **Extraction** ([`article`] + [`dates`]): Visit each article in turn
//!    and build an [`crate::models::ArticleItem`] via ordered fallback
//!    chains per field. The publication date gets its own module because it
//!    is the most failure-prone field: dates are published inconsistently,
//!    so four sources are tried in order before giving up.
//!
//! Failed article fetches are logged and skipped; they never abort the run.

pub mod article;
pub mod dates;
pub mod listing;
