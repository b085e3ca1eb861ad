//! Progressive (batched) delivery.
//!
//! Wraps the search pipeline in a pull-based, finite, forward-only sequence
//! of batches. Each pull runs the pipeline for the next slice of results,
//! excluding URLs already delivered; the terminal batch carries
//! `is_complete = true` exactly once. Cancellation is cooperative: flipping
//! the flag (or simply ceasing to pull) stops further batches, but already
//! issued upstream calls are not force-cancelled.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::time::Instant;
use tracing::debug;

use super::runner::SearchOrchestrator;
use super::types::{ProgressiveSearchResult, SearchOptions};

/// Cloneable cancellation handle for a progressive search.
#[derive(Clone)]
pub struct ProgressiveCancel {
    cancelled: Arc<AtomicBool>,
}

impl ProgressiveCancel {
    /// Signal the search to stop yielding further batches.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}

/// A progressive search in flight. Not restartable; once the terminal batch
/// has been yielded, `next_batch` returns `None` forever.
pub struct ProgressiveSearch {
    orchestrator: SearchOrchestrator,
    options: SearchOptions,
    delivered: HashSet<String>,
    delivered_count: usize,
    batch_index: usize,
    total_batches: usize,
    batch_size: usize,
    done: bool,
    cancelled: Arc<AtomicBool>,
}

impl ProgressiveSearch {
    pub(crate) fn new(orchestrator: SearchOrchestrator, options: SearchOptions) -> Self {
        let batch_size = orchestrator.config().progressive_batch_size.max(1);
        let num_results = options.num_results.max(1);
        let total_batches = num_results.div_ceil(batch_size);

        Self {
            orchestrator,
            options,
            delivered: HashSet::new(),
            delivered_count: 0,
            batch_index: 0,
            total_batches,
            batch_size,
            done: false,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Handle for cancelling from elsewhere (another task, a UI callback).
    pub fn cancel_handle(&self) -> ProgressiveCancel {
        ProgressiveCancel {
            cancelled: Arc::clone(&self.cancelled),
        }
    }

    /// Stop yielding further batches.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Produce the next batch, or `None` once the sequence has terminated
    /// (naturally or by cancellation).
    pub async fn next_batch(&mut self) -> Option<ProgressiveSearchResult> {
        if self.done || self.cancelled.load(Ordering::SeqCst) {
            return None;
        }

        let start = Instant::now();
        let num_results = self.options.num_results.max(1);
        let remaining = num_results - self.delivered_count;
        let batch_target = remaining.min(self.batch_size);

        // Ask the pipeline for everything delivered so far plus this batch;
        // the cumulative request keeps cache and dedup keys aligned across
        // pulls.
        let mut batch_options = self.options.clone();
        batch_options.num_results = self.delivered_count + batch_target;

        let response = self.orchestrator.search(&batch_options).await;

        let fresh: Vec<_> = response
            .links
            .into_iter()
            .filter(|r| !self.delivered.contains(&r.url))
            .take(batch_target)
            .collect();

        for result in &fresh {
            self.delivered.insert(result.url.clone());
        }
        self.delivered_count += fresh.len();

        let exhausted = fresh.is_empty() || !response.success;
        let is_complete = self.delivered_count >= num_results
            || self.batch_index + 1 >= self.total_batches
            || exhausted;

        let batch = ProgressiveSearchResult {
            batch_index: self.batch_index,
            total_batches: self.total_batches,
            batch_size: self.batch_size,
            is_complete,
            results: fresh,
            elapsed_ms: start.elapsed().as_millis() as u64,
        };

        debug!(
            batch = batch.batch_index,
            delivered = self.delivered_count,
            complete = is_complete,
            "Progressive batch"
        );

        self.batch_index += 1;
        if is_complete {
            self.done = true;
        }

        Some(batch)
    }
}
