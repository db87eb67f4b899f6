//! HTTP client for the external shopping-search API (SerpAPI Google
//! Shopping engine).
//!
//! Wraps `reqwest` with typed response deserialization and a classified
//! error for non-2xx upstream responses. One attempt per call: retries, if
//! ever desired, belong to the request orchestrator's failure policy.

use std::time::Duration;

use reqwest::{Client, Url};

use pricecheck_core::RawListing;

use crate::error::SearchError;
use crate::types::ShoppingSearchResponse;

const DEFAULT_BASE_URL: &str = "https://serpapi.com/";

// Fixed query shape: 10 results, US locale.
const RESULT_COUNT: &str = "10";
const COUNTRY: &str = "us";
const LANGUAGE: &str = "en";

/// Client for the shopping-search API.
///
/// Use [`SearchClient::new`] for production or
/// [`SearchClient::with_base_url`] to point at a mock server in tests.
pub struct SearchClient {
    client: Client,
    api_key: String,
    endpoint: Url,
}

impl SearchClient {
    /// Creates a new client pointed at the production search API.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, SearchError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`SearchError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("pricecheck/0.1 (price-comparison)")
            .build()?;

        let endpoint = format!("{}/search.json", base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&endpoint).map_err(|e| SearchError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            endpoint,
        })
    }

    /// Runs one shopping search for `product_name` and returns the raw
    /// listings in API order.
    ///
    /// # Errors
    ///
    /// - [`SearchError::UnexpectedStatus`] when the API answers non-2xx;
    ///   the status and a body snippet are preserved for logging.
    /// - [`SearchError::Http`] on network failure or timeout.
    /// - [`SearchError::Deserialize`] if the body does not match the
    ///   expected shape.
    pub async fn search(&self, product_name: &str) -> Result<Vec<RawListing>, SearchError> {
        let url = self.search_url(product_name);
        tracing::debug!(q = product_name, "shopping search request");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(200).collect();
            return Err(SearchError::UnexpectedStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        let body = response.text().await?;
        let parsed: ShoppingSearchResponse =
            serde_json::from_str(&body).map_err(|e| SearchError::Deserialize {
                context: format!("search(q={product_name})"),
                source: e,
            })?;

        Ok(parsed.shopping_results.into_iter().map(Into::into).collect())
    }

    /// Builds the full request URL with percent-encoded query parameters.
    fn search_url(&self, product_name: &str) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("engine", "google_shopping");
            pairs.append_pair("q", product_name);
            pairs.append_pair("api_key", &self.api_key);
            pairs.append_pair("num", RESULT_COUNT);
            pairs.append_pair("gl", COUNTRY);
            pairs.append_pair("hl", LANGUAGE);
        }
        url
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
