//! HTTP page fetcher shared by the whole pipeline.
//!
//! A single [`Fetcher`] is built once from the CLI options and passed to
//! every component that needs the network. The identifying headers and the
//! per-request timeout live on the underlying `reqwest::Client`, so no
//! component carries ambient request configuration of its own.
//!
//! # Error Surface
//!
//! - [`Fetcher::get_text`] fails on connection errors and non-2xx statuses.
//!   The caller decides whether that is fatal (the listing page) or a skip
//!   (an individual article).
//! - [`Fetcher::get_head`] never fails: any transport error or non-2xx
//!   status yields an empty header map. It only feeds the last fallback
//!   tier of date resolution, where absence is an acceptable answer.

use reqwest::Client;
use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};
use std::error::Error;
use std::time::Duration;
use tracing::{debug, instrument};

/// HTTP client wrapper with fixed identifying headers and timeout.
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Build a fetcher with the given identity and per-request timeout.
    ///
    /// # Arguments
    ///
    /// * `user_agent` - Value for the `User-Agent` header on every request
    /// * `lang` - Value for the `Accept-Language` header on every request
    /// * `timeout` - Per-request network timeout
    ///
    /// # Errors
    ///
    /// Fails if a header value is not valid header text or the client
    /// cannot be constructed.
    pub fn new(user_agent: &str, lang: &str, timeout: Duration) -> Result<Self, Box<dyn Error>> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(user_agent)?);
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_str(lang)?);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Fetcher { client })
    }

    /// Fetch a page body as text.
    ///
    /// # Errors
    ///
    /// Fails on connection errors, timeouts, and non-2xx statuses.
    #[instrument(level = "debug", skip(self))]
    pub async fn get_text(&self, url: &str) -> Result<String, reqwest::Error> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.text().await?;
        debug!(bytes = body.len(), "Fetched page body");
        Ok(body)
    }

    /// Issue a HEAD request and return the response headers.
    ///
    /// Any failure (transport error, timeout, non-2xx status) yields an
    /// empty header map instead of an error.
    #[instrument(level = "debug", skip(self))]
    pub async fn get_head(&self, url: &str) -> HeaderMap {
        let response = match self.client.head(url).send().await {
            Ok(r) => r,
            Err(e) => {
                debug!(error = %e, "HEAD request failed");
                return HeaderMap::new();
            }
        };
        match response.error_for_status() {
            Ok(r) => r.headers().clone(),
            Err(e) => {
                debug!(error = %e, "HEAD request returned error status");
                HeaderMap::new()
            }
        }
    }
}
