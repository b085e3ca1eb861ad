//! TTL + capacity bounded result cache.
//!
//! Maps a normalized search fingerprint to a prior result set. Entries past
//! their TTL are never returned but are not deleted eagerly on read; the
//! sweep runs on insert once the map reaches capacity. Live entries are
//! never evicted.
//!
//! Constructed once at process start and shared via `Arc`; state lives
//! behind `tokio::sync::RwLock`, mutated only at await points.

use std::collections::HashMap;
use tokio::sync::RwLock;
use tokio::time::{Duration, Instant};
use tracing::debug;

use crate::config::CacheConfig;
use crate::orchestrator::{ContentKind, DiySearchResult, ResourceType};

struct CacheEntry {
    results: Vec<DiySearchResult>,
    stored_at: Instant,
}

struct FrequencyRecord {
    count: u64,
    last_used: Instant,
}

/// Process-wide result cache with query-frequency statistics.
pub struct ResultCache {
    ttl: Duration,
    capacity: usize,
    frequency_ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
    frequency: RwLock<HashMap<String, FrequencyRecord>>,
}

impl ResultCache {
    /// Create a cache from configuration.
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            ttl: Duration::from_secs(config.ttl_secs),
            capacity: config.capacity,
            frequency_ttl: Duration::from_secs(config.query_frequency_ttl_secs),
            entries: RwLock::new(HashMap::new()),
            frequency: RwLock::new(HashMap::new()),
        }
    }

    /// Cache fingerprint: normalized query + resource type + content kind +
    /// project identity.
    fn key(query: &str, resource_type: ResourceType, content_type: ContentKind, project_id: &str) -> String {
        let normalized = query.trim().to_lowercase();
        let normalized = normalized.split_whitespace().collect::<Vec<_>>().join(" ");
        format!(
            "{}|{}|{}|{}",
            normalized,
            resource_type.as_str(),
            content_type.as_str(),
            project_id
        )
    }

    /// Look up a fresh entry. Returns a copy of the stored result list, or
    /// `None` on miss or expiry.
    pub async fn get(
        &self,
        query: &str,
        resource_type: ResourceType,
        content_type: ContentKind,
        project_id: &str,
    ) -> Option<Vec<DiySearchResult>> {
        let key = Self::key(query, resource_type, content_type, project_id);
        let entries = self.entries.read().await;
        let entry = entries.get(&key)?;

        if entry.stored_at.elapsed() >= self.ttl {
            return None;
        }

        Some(entry.results.clone())
    }

    /// Store a result set under the search fingerprint.
    ///
    /// Takes a defensive copy so later mutation by the caller cannot corrupt
    /// the cached snapshot. At capacity, expired entries are swept first.
    pub async fn set(
        &self,
        query: &str,
        resource_type: ResourceType,
        content_type: ContentKind,
        project_id: &str,
        results: &[DiySearchResult],
    ) {
        let key = Self::key(query, resource_type, content_type, project_id);
        let mut entries = self.entries.write().await;

        if entries.len() >= self.capacity {
            let before = entries.len();
            let ttl = self.ttl;
            entries.retain(|_, e| e.stored_at.elapsed() < ttl);
            debug!(swept = before - entries.len(), "Cache capacity sweep");
        }

        entries.insert(
            key,
            CacheEntry {
                results: results.to_vec(),
                stored_at: Instant::now(),
            },
        );
    }

    /// Drop every cached entry and frequency record.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
        self.frequency.write().await.clear();
    }

    /// Number of stored entries, expired ones included.
    pub async fn entry_count(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Record one use of a query for frequency analytics.
    pub async fn track_query(&self, query: &str) {
        let normalized = query.trim().to_lowercase();
        if normalized.is_empty() {
            return;
        }

        let mut frequency = self.frequency.write().await;
        if frequency.len() >= self.capacity {
            let ttl = self.frequency_ttl;
            frequency.retain(|_, r| r.last_used.elapsed() < ttl);
        }

        let record = frequency.entry(normalized).or_insert(FrequencyRecord {
            count: 0,
            last_used: Instant::now(),
        });
        record.count += 1;
        record.last_used = Instant::now();
    }

    /// Most frequent recent queries, for analytics-only suggestions.
    pub async fn frequent_queries(&self, limit: usize) -> Vec<(String, u64)> {
        let frequency = self.frequency.read().await;
        let mut live: Vec<(String, u64)> = frequency
            .iter()
            .filter(|(_, r)| r.last_used.elapsed() < self.frequency_ttl)
            .map(|(q, r)| (q.clone(), r.count))
            .collect();
        live.sort_by(|a, b| b.1.cmp(&a.1));
        live.truncate(limit);
        live
    }
}
