//! HTTP client for the hosted neural-search API.

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::ProviderConfig;

use super::{ProviderError, ProviderQuery, RawCandidate, SearchMode, SearchProvider};

/// reqwest-backed implementation of `SearchProvider`.
///
/// The API credential is read once at construction; the client carries a
/// transport-level timeout, which is the only timeout in this crate.
pub struct NeuralClient {
    client: Client,
    config: ProviderConfig,
}

impl NeuralClient {
    /// Create a new client from provider configuration.
    pub fn new(config: ProviderConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn post_search(
        &self,
        path: &str,
        body: &SearchRequestBody,
    ) -> Result<Vec<RawCandidate>, ProviderError> {
        let response = self
            .client
            .post(self.endpoint(path))
            .header("x-api-key", &self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout
                } else if e.is_connect() {
                    ProviderError::ConnectionFailed(e.to_string())
                } else {
                    ProviderError::ApiError(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let parsed: SearchResponseBody = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        debug!(results = parsed.results.len(), path = path, "Provider search complete");

        Ok(parsed
            .results
            .into_iter()
            .map(|r| RawCandidate {
                url: r.url,
                title: r.title.unwrap_or_default(),
                text: r.text.unwrap_or_default(),
                published_date: r.published_date.and_then(|d| parse_published_date(&d)),
                score: r.score.unwrap_or(0.0),
            })
            .collect())
    }
}

#[async_trait::async_trait]
impl SearchProvider for NeuralClient {
    fn name(&self) -> &str {
        "neural"
    }

    async fn search(&self, query: &ProviderQuery) -> Result<Vec<RawCandidate>, ProviderError> {
        debug!(query = %query.query, num_results = query.num_results, "Provider search");
        self.post_search("search", &SearchRequestBody::from_query(query, None))
            .await
    }

    async fn find_similar(
        &self,
        url: &str,
        query: &ProviderQuery,
    ) -> Result<Vec<RawCandidate>, ProviderError> {
        debug!(url = url, "Provider find-similar");
        self.post_search(
            "find_similar",
            &SearchRequestBody::from_query(query, Some(url.to_string())),
        )
        .await
    }
}

/// Parse the provider's published-date field leniently.
///
/// The API documents RFC 3339, but dates without an offset show up in
/// practice.
fn parse_published_date(date_str: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(date_str)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| {
            chrono::NaiveDateTime::parse_from_str(date_str, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|ndt| ndt.and_utc())
        })
        .or_else(|| {
            chrono::NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
                .ok()
                .and_then(|nd| nd.and_hms_opt(0, 0, 0))
                .map(|ndt| ndt.and_utc())
        })
}

// Wire types, private to this implementation.

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequestBody {
    query: String,
    num_results: usize,
    use_autoprompt: bool,
    #[serde(rename = "type")]
    search_type: String,
    text_max_chars: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    include_domains: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

impl SearchRequestBody {
    fn from_query(query: &ProviderQuery, url: Option<String>) -> Self {
        Self {
            query: query.query.clone(),
            num_results: query.num_results,
            use_autoprompt: query.use_autoprompt,
            search_type: match query.mode {
                SearchMode::Neural => "neural".to_string(),
                SearchMode::Keyword => "keyword".to_string(),
            },
            text_max_chars: query.text_max_chars,
            include_domains: query.include_domains.clone(),
            url,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponseBody {
    #[serde(default)]
    results: Vec<ResponseResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseResult {
    url: String,
    title: Option<String>,
    text: Option<String>,
    published_date: Option<String>,
    score: Option<f32>,
}
