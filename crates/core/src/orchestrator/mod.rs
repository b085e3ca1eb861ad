//! Search orchestration.
//!
//! Runs one or several search strategies against the upstream provider,
//! merges and deduplicates by URL, applies pre-filtering, classification,
//! relevance validation and balancing, and reports results either as one
//! response or as a progressive sequence of batches.
//!
//! # Architecture
//!
//! ```text
//! caller -> ResultCache (hit returns immediately)
//!        -> QueryOptimizer -> RequestDeduplicator
//!        -> strategies (parallel, join-all) -> prefilter -> classify
//!        -> relevance validation -> backup ladder (if thin)
//!        -> balancing -> ResultCache write -> caller
//! ```

mod backup;
mod config;
mod progressive;
mod runner;
mod types;

pub use config::OrchestratorConfig;
pub use progressive::{ProgressiveCancel, ProgressiveSearch};
pub use runner::SearchOrchestrator;
pub use types::*;
