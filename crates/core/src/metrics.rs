//! Prometheus metrics for the search pipeline.
//!
//! Observability only: nothing here feeds back into ranking. Covers
//! latency, cache hit rate, error rate, and pre-filter efficiency.

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

/// Search duration in seconds, labelled by outcome.
pub static SEARCH_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new("fixit_search_duration_seconds", "Duration of search calls")
            .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["result"], // "success", "empty", "error"
    )
    .unwrap()
});

/// Cache hits total.
pub static CACHE_HITS: Lazy<IntCounter> =
    Lazy::new(|| IntCounter::new("fixit_cache_hits_total", "Total result cache hits").unwrap());

/// Cache misses total.
pub static CACHE_MISSES: Lazy<IntCounter> =
    Lazy::new(|| IntCounter::new("fixit_cache_misses_total", "Total result cache misses").unwrap());

/// Search errors total by stage.
pub static SEARCH_ERRORS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("fixit_search_errors_total", "Total search errors"),
        &["stage"], // "strategy", "backup", "pipeline"
    )
    .unwrap()
});

/// Raw candidates seen by the pre-filter.
pub static PREFILTER_CANDIDATES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "fixit_prefilter_candidates_total",
        "Raw candidates entering the pre-filter",
    )
    .unwrap()
});

/// Raw candidates rejected by the pre-filter.
pub static PREFILTER_REJECTED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "fixit_prefilter_rejected_total",
        "Raw candidates rejected by the pre-filter",
    )
    .unwrap()
});

/// Queries changed by the optimizer.
pub static QUERIES_OPTIMIZED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "fixit_queries_optimized_total",
        "Queries rewritten by the optimizer",
    )
    .unwrap()
});

/// Backup-strategy escalations.
pub static BACKUP_INVOCATIONS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "fixit_backup_invocations_total",
        "Times the backup-strategy ladder ran",
    )
    .unwrap()
});

/// Links returned per successful search.
pub static SEARCH_RESULTS: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new("fixit_search_results", "Links returned per search")
            .buckets(vec![0.0, 1.0, 2.0, 3.0, 5.0, 8.0, 13.0, 21.0]),
        &[],
    )
    .unwrap()
});

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(SEARCH_DURATION.clone()),
        Box::new(CACHE_HITS.clone()),
        Box::new(CACHE_MISSES.clone()),
        Box::new(SEARCH_ERRORS.clone()),
        Box::new(PREFILTER_CANDIDATES.clone()),
        Box::new(PREFILTER_REJECTED.clone()),
        Box::new(QUERIES_OPTIMIZED.clone()),
        Box::new(BACKUP_INVOCATIONS.clone()),
        Box::new(SEARCH_RESULTS.clone()),
    ]
}
