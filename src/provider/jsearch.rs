use std::num::NonZeroU32;
use std::time::Duration;

use governor::Quota;
use governor::RateLimiter;
use governor::clock::QuantaClock;
use governor::state::InMemoryState;
use governor::state::direct::NotKeyed;
use log::debug;
use log::info;
use log::warn;
use reqwest::Client;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;

use super::error::ProviderError;
use super::model::RawPosting;
use super::model::SearchCriteria;
use super::model::SearchResponse;

const JSEARCH_HOST: &str = "jsearch.p.rapidapi.com";

/// HTTP client for the JSearch provider.
///
/// One `fetch` call maps to exactly one outbound request; callers decide
/// whether and when to retry.
pub struct JSearchClient {
    pub base_url: String,
    client: Client,
    limiter: RateLimiter<NotKeyed, InMemoryState, QuantaClock>,
}

impl JSearchClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let mut headers = HeaderMap::new();
        headers.insert("X-RapidAPI-Host", HeaderValue::from_static(JSEARCH_HOST));
        if let Ok(key) = HeaderValue::from_str(api_key) {
            headers.insert("X-RapidAPI-Key", key);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        // JSearch plans meter by requests per second; stay at 1/s.
        let limiter = RateLimiter::direct(Quota::per_second(NonZeroU32::new(1).unwrap()));

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            limiter,
        })
    }

    /// Runs one search request. Pagination is fixed to the first page.
    pub async fn fetch(&self, criteria: &SearchCriteria) -> Result<Vec<RawPosting>, ProviderError> {
        if self.limiter.check().is_err() {
            info!("JSearch client is ratelimited. Waiting...");
        }
        self.limiter.until_ready().await;

        let query = criteria.query_string();
        let url = format!("{}/search", self.base_url);
        debug!("Making request to: {url}");
        let response = self
            .client
            .get(url)
            .query(&[
                ("query", query.as_str()),
                ("page", "1"),
                ("num_pages", "1"),
                ("country", criteria.country.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                "Provider returned status {status} for query `{query}`: {}",
                body.chars().take(500).collect::<String>()
            );
            return Err(ProviderError::BadStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let parsed: SearchResponse = serde_json::from_str(&body)?;

        debug!(
            "Provider returned {} postings for query `{query}`",
            parsed.data.len()
        );
        Ok(parsed.data)
    }
}
