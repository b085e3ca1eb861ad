//! Mock search provider for testing.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::provider::{ProviderError, ProviderQuery, RawCandidate, SearchProvider};

/// A recorded upstream call for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedQuery {
    /// The query text that was searched.
    pub query: String,
    /// Requested result count.
    pub num_results: usize,
    /// `Some(url)` when the call was a find-similar.
    pub similar_to: Option<String>,
}

/// A query handler that produces candidates dynamically based on the query.
type QueryHandler = Box<dyn Fn(&str) -> Option<Vec<RawCandidate>> + Send + Sync>;

/// Mock implementation of the `SearchProvider` trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable candidates
/// - Track upstream calls for assertions
/// - Simulate one-shot or persistent failures
pub struct MockProvider {
    candidates: Arc<RwLock<Vec<RawCandidate>>>,
    calls: Arc<RwLock<Vec<RecordedQuery>>>,
    next_error: Arc<RwLock<Option<ProviderError>>>,
    persistent_error: Arc<RwLock<Option<ProviderError>>>,
    query_handler: Arc<RwLock<Option<QueryHandler>>>,
    response_delay: Arc<RwLock<Option<Duration>>>,
}

impl std::fmt::Debug for MockProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockProvider").finish_non_exhaustive()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProvider {
    /// Create a mock provider with no candidates.
    pub fn new() -> Self {
        Self {
            candidates: Arc::new(RwLock::new(Vec::new())),
            calls: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            persistent_error: Arc::new(RwLock::new(None)),
            query_handler: Arc::new(RwLock::new(None)),
            response_delay: Arc::new(RwLock::new(None)),
        }
    }

    /// Simulate a slow provider: every call sleeps this long first.
    pub async fn set_response_delay(&self, delay: Duration) {
        *self.response_delay.write().await = Some(delay);
    }

    /// Set the candidates returned by subsequent searches.
    pub async fn set_candidates(&self, candidates: Vec<RawCandidate>) {
        *self.candidates.write().await = candidates;
    }

    /// Add a single candidate.
    pub async fn add_candidate(&self, candidate: RawCandidate) {
        self.candidates.write().await.push(candidate);
    }

    /// Configure the next search to fail with the given error (consumed).
    pub async fn set_next_error(&self, error: ProviderError) {
        *self.next_error.write().await = Some(error);
    }

    /// Make every call fail with the given error until cleared.
    pub async fn set_persistent_error(&self, error: ProviderError) {
        *self.persistent_error.write().await = Some(error);
    }

    /// Clear the persistent error.
    pub async fn clear_persistent_error(&self) {
        *self.persistent_error.write().await = None;
    }

    /// Set a handler that generates candidates per query string. Return
    /// `None` from the handler to fall through to the configured
    /// candidates.
    pub async fn set_query_handler<F>(&self, handler: F)
    where
        F: Fn(&str) -> Option<Vec<RawCandidate>> + Send + Sync + 'static,
    {
        *self.query_handler.write().await = Some(Box::new(handler));
    }

    /// All recorded upstream calls, in order.
    pub async fn recorded_calls(&self) -> Vec<RecordedQuery> {
        self.calls.read().await.clone()
    }

    /// Number of upstream calls performed.
    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }

    async fn take_error(&self) -> Option<ProviderError> {
        if let Some(error) = self.persistent_error.read().await.clone() {
            return Some(error);
        }
        self.next_error.write().await.take()
    }

    async fn respond(&self, query: &ProviderQuery) -> Result<Vec<RawCandidate>, ProviderError> {
        if let Some(delay) = *self.response_delay.read().await {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = self.take_error().await {
            return Err(error);
        }

        let handler = self.query_handler.read().await;
        if let Some(ref h) = *handler {
            if let Some(handled) = h(&query.query) {
                return Ok(handled.into_iter().take(query.num_results).collect());
            }
        }
        drop(handler);

        Ok(self
            .candidates
            .read()
            .await
            .iter()
            .take(query.num_results)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SearchProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn search(&self, query: &ProviderQuery) -> Result<Vec<RawCandidate>, ProviderError> {
        self.calls.write().await.push(RecordedQuery {
            query: query.query.clone(),
            num_results: query.num_results,
            similar_to: None,
        });
        self.respond(query).await
    }

    async fn find_similar(
        &self,
        url: &str,
        query: &ProviderQuery,
    ) -> Result<Vec<RawCandidate>, ProviderError> {
        self.calls.write().await.push(RecordedQuery {
            query: query.query.clone(),
            num_results: query.num_results,
            similar_to: Some(url.to_string()),
        });
        self.respond(query).await
    }
}
