//! Types for the upstream search capability.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Search mode requested from the upstream provider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    #[default]
    Neural,
    Keyword,
}

/// Query parameters for one upstream call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderQuery {
    /// Free-text query.
    pub query: String,
    /// Maximum candidates to return.
    pub num_results: usize,
    /// Let the provider rewrite the query for its own ranking.
    #[serde(default)]
    pub use_autoprompt: bool,
    /// Search mode (default: neural).
    #[serde(default)]
    pub mode: SearchMode,
    /// Cap on extracted text per candidate, in characters.
    #[serde(default = "default_text_max_chars")]
    pub text_max_chars: usize,
    /// Optional domain allowlist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_domains: Option<Vec<String>>,
}

fn default_text_max_chars() -> usize {
    1000
}

impl ProviderQuery {
    /// A neural query with autoprompt on, the common case in the pipeline.
    pub fn neural(query: impl Into<String>, num_results: usize) -> Self {
        Self {
            query: query.into(),
            num_results,
            use_autoprompt: true,
            mode: SearchMode::Neural,
            text_max_chars: default_text_max_chars(),
            include_domains: None,
        }
    }
}

/// A raw candidate document as returned by the upstream provider.
///
/// Owned transiently by the orchestrator during one search; candidates with
/// a missing or invalid url are dropped silently during processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCandidate {
    pub url: String,
    pub title: String,
    /// Extracted text / snippet. May be empty.
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<DateTime<Utc>>,
    /// Provider relevance score. Not assumed to be in any particular range.
    #[serde(default)]
    pub score: f32,
}

/// Errors from the upstream search capability.
///
/// `Clone` because deduplicated callers share the same outcome.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("provider connection failed: {0}")]
    ConnectionFailed(String),

    #[error("provider API error: {0}")]
    ApiError(String),

    #[error("provider returned an unparseable response: {0}")]
    InvalidResponse(String),

    #[error("provider request timed out")]
    Timeout,
}

/// Trait for upstream search backends.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Provider name for logging and metrics labels.
    fn name(&self) -> &str;

    /// Execute a search and return raw candidates.
    async fn search(&self, query: &ProviderQuery) -> Result<Vec<RawCandidate>, ProviderError>;

    /// Find documents similar to the given URL.
    async fn find_similar(
        &self,
        url: &str,
        query: &ProviderQuery,
    ) -> Result<Vec<RawCandidate>, ProviderError>;
}
