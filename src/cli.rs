//! Command-line interface definitions for pagefeed.
//!
//! This module defines the CLI arguments and options using the `clap`
//! crate. Only the listing URL is required; the base origin and the
//! article path prefix default to values derived from it.

use clap::Parser;

/// Command-line arguments for the pagefeed binary.
///
/// # Examples
///
/// ```sh
/// # Feed from a listing page, defaults derived from the URL
/// pagefeed https://sammen.no/no/artikkel
///
/// # Custom output path, item cap, and a fallback image
/// pagefeed https://sammen.no/no/artikkel \
///     --out feeds/sammen.xml --max-items 20 \
///     --default-image https://sammen.no/static/logo.png
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// URL of the listing page to derive the feed from
    pub list_url: String,

    /// Base origin for resolving relative links (default: origin of LIST_URL)
    #[arg(long)]
    pub base: Option<String>,

    /// Path prefix that article links must live under (default: path of LIST_URL)
    #[arg(long)]
    pub path_prefix: Option<String>,

    /// Output path for the feed document
    #[arg(short, long, default_value = "public/rss.xml")]
    pub out: String,

    /// Maximum number of feed items (values below 1 are treated as 1)
    #[arg(short = 'n', long, default_value_t = 10)]
    pub max_items: usize,

    /// Suggested reader refresh interval in minutes (the feed ttl)
    #[arg(long, default_value_t = 30)]
    pub refresh_minutes: u32,

    /// Fallback image URL for articles without a preview image
    #[arg(long)]
    pub default_image: Option<String>,

    /// Per-request network timeout in seconds
    #[arg(long, default_value_t = 15)]
    pub timeout_secs: u64,

    /// Politeness delay between article requests, in milliseconds
    #[arg(long, default_value_t = 400)]
    pub delay_ms: u64,

    /// Accept-Language header value sent with every request
    #[arg(long, default_value = "en-US,en;q=0.8")]
    pub lang: String,

    /// User-Agent header value sent with every request
    #[arg(
        long,
        default_value = concat!("pagefeed/", env!("CARGO_PKG_VERSION"), " (+contact: rssbot@example.org)")
    )]
    pub user_agent: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["pagefeed", "https://example.org/no/artikkel"]);
        assert_eq!(cli.list_url, "https://example.org/no/artikkel");
        assert_eq!(cli.out, "public/rss.xml");
        assert_eq!(cli.max_items, 10);
        assert_eq!(cli.refresh_minutes, 30);
        assert_eq!(cli.timeout_secs, 15);
        assert_eq!(cli.delay_ms, 400);
        assert!(cli.base.is_none());
        assert!(cli.path_prefix.is_none());
        assert!(cli.default_image.is_none());
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "pagefeed",
            "https://example.org/no/artikkel",
            "--base",
            "https://example.org",
            "--path-prefix",
            "/no/artikkel/",
            "-o",
            "feeds/out.xml",
            "-n",
            "25",
            "--delay-ms",
            "0",
        ]);
        assert_eq!(cli.base.as_deref(), Some("https://example.org"));
        assert_eq!(cli.path_prefix.as_deref(), Some("/no/artikkel/"));
        assert_eq!(cli.out, "feeds/out.xml");
        assert_eq!(cli.max_items, 25);
        assert_eq!(cli.delay_ms, 0);
    }
}
