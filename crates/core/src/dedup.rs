//! Request deduplication.
//!
//! Collapses concurrent identical searches into one upstream call: callers
//! with the same key await the same shared future and observe the identical
//! success or failure outcome. A completed entry stays registered for a
//! short retention window to absorb request bursts, then a cleanup task
//! removes it. The registry is cleared wholesale past a safety threshold to
//! bound memory under pathological key cardinality.

use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{sleep, Duration};
use tracing::{debug, warn};

use crate::config::DedupConfig;
use crate::orchestrator::{ContentKind, DiySearchResult, ResourceType, SearchError};

type SharedSearch = Shared<BoxFuture<'static, Result<Vec<DiySearchResult>, SearchError>>>;

/// Identity of one upstream search unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub query: String,
    pub resource_type: ResourceType,
    pub content_type: ContentKind,
    pub num_results: usize,
}

/// Collapses concurrent identical in-flight searches.
pub struct RequestDeduplicator {
    retention: Duration,
    max_entries: usize,
    in_flight: Arc<Mutex<HashMap<DedupKey, SharedSearch>>>,
}

impl RequestDeduplicator {
    /// Create a deduplicator from configuration.
    pub fn new(config: &DedupConfig) -> Self {
        Self {
            retention: Duration::from_secs(config.retention_secs),
            max_entries: config.max_entries,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Run `producer` under the given key, sharing its outcome with every
    /// concurrent caller holding the same key.
    ///
    /// If an entry is already pending for `key`, the passed producer is
    /// dropped un-polled. Producer errors propagate to every waiter; retries
    /// belong to the orchestrator, not here.
    pub async fn run<F>(&self, key: DedupKey, producer: F) -> Result<Vec<DiySearchResult>, SearchError>
    where
        F: Future<Output = Result<Vec<DiySearchResult>, SearchError>> + Send + 'static,
    {
        let shared = {
            let mut in_flight = self.in_flight.lock().await;

            if let Some(existing) = in_flight.get(&key) {
                debug!(query = %key.query, "Joining in-flight search");
                existing.clone()
            } else {
                if in_flight.len() >= self.max_entries {
                    warn!(entries = in_flight.len(), "Dedup registry over threshold, clearing");
                    in_flight.clear();
                }

                let shared: SharedSearch = producer.boxed().shared();
                in_flight.insert(key.clone(), shared.clone());
                self.schedule_removal(key, shared.clone());
                shared
            }
        };

        shared.await
    }

    /// Remove the entry a fixed delay after its future settles.
    fn schedule_removal(&self, key: DedupKey, shared: SharedSearch) {
        let in_flight = Arc::clone(&self.in_flight);
        let retention = self.retention;
        tokio::spawn(async move {
            let _ = shared.clone().await;
            sleep(retention).await;
            let mut map = in_flight.lock().await;
            // Only remove our own registration; a wholesale clear may have
            // already replaced it with a newer future.
            if map.get(&key).is_some_and(|current| current.ptr_eq(&shared)) {
                map.remove(&key);
            }
        });
    }

    /// Number of registered entries (pending or within retention).
    pub async fn entry_count(&self) -> usize {
        self.in_flight.lock().await.len()
    }
}
