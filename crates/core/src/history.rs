//! Search history collaborator.
//!
//! Persistence of history and favorites lives outside this crate; the
//! orchestrator only needs a write-after-success hook and a read hook for
//! analytics-only suggestions. Implementations decide where records go.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::orchestrator::{ContentKind, ResourceType};

/// One successful search, as reported to the history collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRecord {
    pub id: Uuid,
    pub query: String,
    pub resource_type: ResourceType,
    pub content_type: ContentKind,
    pub result_count: usize,
    /// Project fingerprint, or "global".
    pub project_id: String,
    pub searched_at: DateTime<Utc>,
}

impl SearchRecord {
    pub fn new(
        query: impl Into<String>,
        resource_type: ResourceType,
        content_type: ContentKind,
        result_count: usize,
        project_id: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            query: query.into(),
            resource_type,
            content_type,
            result_count,
            project_id: project_id.into(),
            searched_at: Utc::now(),
        }
    }
}

/// Trait for history/favorites stores.
///
/// Failures are the store's problem: the orchestrator logs and moves on,
/// a search never fails because history could not be written.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Record a successful search.
    async fn record_search(&self, record: SearchRecord);

    /// Most recent searches, newest first.
    async fn recent_searches(&self, limit: usize) -> Vec<SearchRecord>;
}
