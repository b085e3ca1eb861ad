//! In-memory history store for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::history::{HistoryStore, SearchRecord};

/// Mock implementation of `HistoryStore` that keeps records in memory.
#[derive(Default)]
pub struct MockHistoryStore {
    records: Arc<RwLock<Vec<SearchRecord>>>,
}

impl MockHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded searches, oldest first.
    pub async fn records(&self) -> Vec<SearchRecord> {
        self.records.read().await.clone()
    }

    pub async fn record_count(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl HistoryStore for MockHistoryStore {
    async fn record_search(&self, record: SearchRecord) {
        self.records.write().await.push(record);
    }

    async fn recent_searches(&self, limit: usize) -> Vec<SearchRecord> {
        let records = self.records.read().await;
        records.iter().rev().take(limit).cloned().collect()
    }
}
