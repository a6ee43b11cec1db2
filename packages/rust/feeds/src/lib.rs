//! Public feed collaborators: Google News RSS headlines and subreddit posts.
//!
//! This crate provides:
//! - [`FeedClient`] — shared HTTP client with overridable endpoints
//! - [`news`] — Google News RSS search, parsed with `quick-xml`
//! - [`reddit`] — subreddit hot posts and top comments via the public JSON API
//!
//! Fetchers never retry; a failed request surfaces as
//! [`BleacherError::Network`] and the caller decides what to substitute.

pub mod news;
pub mod reddit;

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use bleacher_shared::{BleacherError, Result};

pub use news::{NEWS_ITEM_LIMIT, fetch_news, fetch_offseason_news, parse_news_feed};
pub use reddit::{
    REDDIT_COMMENT_LIMIT, REDDIT_POST_LIMIT, clean_reddit_text, fetch_reddit, parse_listing,
};

/// User-Agent string for feed requests.
const USER_AGENT: &str = concat!("Bleacher/", env!("CARGO_PKG_VERSION"));

/// Timeout for a single feed request.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Base URLs of the upstream feeds.
#[derive(Debug, Clone)]
pub struct FeedEndpoints {
    /// Google News origin, e.g. `https://news.google.com`.
    pub news_base: String,
    /// Reddit origin, e.g. `https://www.reddit.com`.
    pub reddit_base: String,
}

impl Default for FeedEndpoints {
    fn default() -> Self {
        Self {
            news_base: "https://news.google.com".into(),
            reddit_base: "https://www.reddit.com".into(),
        }
    }
}

/// HTTP client shared by all fetchers.
#[derive(Debug, Clone)]
pub struct FeedClient {
    client: Client,
    endpoints: FeedEndpoints,
}

impl FeedClient {
    /// Create a client against the public endpoints.
    pub fn new() -> Result<Self> {
        Self::with_endpoints(FeedEndpoints::default())
    }

    /// Create a client against custom endpoints (mock servers, mirrors).
    pub fn with_endpoints(endpoints: FeedEndpoints) -> Result<Self> {
        for base in [&endpoints.news_base, &endpoints.reddit_base] {
            let parsed = Url::parse(base)
                .map_err(|e| BleacherError::config(format!("invalid feed endpoint '{base}': {e}")))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(BleacherError::config(format!(
                    "feed endpoint '{base}' must be http or https"
                )));
            }
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| BleacherError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, endpoints })
    }

    pub fn endpoints(&self) -> &FeedEndpoints {
        &self.endpoints
    }

    /// GET `url` and return the body as text.
    pub(crate) async fn get_text(&self, url: &str) -> Result<String> {
        debug!(%url, "fetching feed");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| BleacherError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BleacherError::Network(format!("{url}: HTTP {status}")));
        }

        response
            .text()
            .await
            .map_err(|e| BleacherError::Network(format!("{url}: body read failed: {e}")))
    }

    /// GET `url` and deserialize the JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let body = self.get_text(url).await?;
        serde_json::from_str(&body).map_err(|e| {
            BleacherError::parse(format!(
                "{url}: invalid JSON: {e} (got: {})",
                body.chars().take(200).collect::<String>()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_endpoints_are_public() {
        let endpoints = FeedEndpoints::default();
        assert_eq!(endpoints.news_base, "https://news.google.com");
        assert_eq!(endpoints.reddit_base, "https://www.reddit.com");
    }

    #[test]
    fn invalid_endpoints_are_config_errors() {
        let err = FeedClient::with_endpoints(FeedEndpoints {
            news_base: "not a url".into(),
            ..FeedEndpoints::default()
        })
        .unwrap_err();
        assert!(matches!(err, BleacherError::Config { .. }));

        let err = FeedClient::with_endpoints(FeedEndpoints {
            reddit_base: "ftp://reddit.test".into(),
            ..FeedEndpoints::default()
        })
        .unwrap_err();
        assert!(err.to_string().contains("http or https"));
    }

    #[tokio::test]
    async fn non_success_status_is_network_error() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::path("/missing"))
            .respond_with(wiremock::ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = FeedClient::new().unwrap();
        let err = client
            .get_text(&format!("{}/missing", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, BleacherError::Network(_)));
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn invalid_json_is_parse_error() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::path("/bad.json"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string("<html>nope"))
            .mount(&server)
            .await;

        let client = FeedClient::new().unwrap();
        let err = client
            .get_json::<serde_json::Value>(&format!("{}/bad.json", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, BleacherError::Parse { .. }));
    }
}
