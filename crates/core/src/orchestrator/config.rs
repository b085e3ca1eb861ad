//! Orchestrator tuning knobs.

use crate::ranking::RelevanceWeights;

/// Tunables for the search pipeline. Defaults reproduce the documented
/// behavior; everything here is safe to adjust.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Share of the target count requested by the main contextual strategy.
    pub main_share: f32,
    /// Share requested by the simplified parallel strategy.
    pub simplified_share: f32,
    /// Share requested by the visual-specific parallel strategy.
    pub visual_share: f32,
    /// Contextual queries longer than this get the simplified strategy.
    pub simplified_min_query_len: usize,
    /// Minimum candidates any strategy asks the provider for.
    pub min_strategy_results: usize,
    /// Relevant-result ratio below which non-relevant results backfill.
    pub relevant_target_ratio: f32,
    /// Relevant-result ratio below which the backup ladder runs.
    pub relevant_floor_ratio: f32,
    /// Per-strategy result cap inside the backup ladder.
    pub backup_strategy_cap: usize,
    /// Results per progressive batch.
    pub progressive_batch_size: usize,
    /// Relevance scoring weights.
    pub relevance: RelevanceWeights,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            main_share: 0.6,
            simplified_share: 0.4,
            visual_share: 0.3,
            simplified_min_query_len: 30,
            min_strategy_results: 2,
            relevant_target_ratio: 0.7,
            relevant_floor_ratio: 0.5,
            backup_strategy_cap: 3,
            progressive_batch_size: 3,
            relevance: RelevanceWeights::default(),
        }
    }
}
