//! The search orchestrator.
//!
//! Coordinates the whole pipeline for one search call. Strategies run as
//! independent concurrent tasks joined with an all-complete barrier; a
//! failing strategy degrades to an empty contribution and never aborts the
//! others. The public operations are infallible by type: every outcome is a
//! structured response.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::cache::ResultCache;
use crate::dedup::{DedupKey, RequestDeduplicator};
use crate::history::{HistoryStore, SearchRecord};
use crate::metrics;
use crate::provider::{ProviderQuery, SearchProvider};
use crate::query::{build_contextual_query, optimize_query, simplify_query, visual_query};
use crate::ranking::{
    apply_validation, balance_results, prefilter_candidates, process_candidate, trusted_domains,
    validate_result,
};

use super::backup::run_backup_ladder;
use super::config::OrchestratorConfig;
use super::progressive::ProgressiveSearch;
use super::types::{
    ContentKind, DiySearchResult, ResourceType, SearchError, SearchOptions, SearchResponse,
};

/// Outcome of one strategy: its surviving results, and whether the upstream
/// call failed outright (as opposed to returning nothing).
pub(crate) struct StrategyOutcome {
    pub results: Vec<DiySearchResult>,
    pub failed: bool,
}

/// The search orchestrator. Collaborators are injected explicitly and
/// shared; cloning is cheap and yields a handle onto the same state.
#[derive(Clone)]
pub struct SearchOrchestrator {
    provider: Arc<dyn SearchProvider>,
    cache: Arc<ResultCache>,
    dedup: Arc<RequestDeduplicator>,
    history: Option<Arc<dyn HistoryStore>>,
    config: OrchestratorConfig,
}

impl SearchOrchestrator {
    /// Create an orchestrator over the given collaborators.
    pub fn new(
        provider: Arc<dyn SearchProvider>,
        cache: Arc<ResultCache>,
        dedup: Arc<RequestDeduplicator>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            provider,
            cache,
            dedup,
            history: None,
            config,
        }
    }

    /// Attach a history store that receives a record after each successful
    /// search.
    pub fn with_history(mut self, history: Arc<dyn HistoryStore>) -> Self {
        self.history = Some(history);
        self
    }

    pub(crate) fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Run one search. Never fails: any internal error becomes a graceful
    /// failure payload.
    pub async fn search(&self, options: &SearchOptions) -> SearchResponse {
        let start = Instant::now();
        let outcome = self.search_inner(options).await;
        let elapsed = start.elapsed().as_secs_f64();

        match outcome {
            Ok(response) => {
                let label = if response.success { "success" } else { "empty" };
                metrics::SEARCH_DURATION
                    .with_label_values(&[label])
                    .observe(elapsed);
                if response.success {
                    metrics::SEARCH_RESULTS
                        .with_label_values(&[])
                        .observe(response.links.len() as f64);
                }
                response
            }
            Err(e) => {
                warn!(error = %e, query = %options.query, "Search pipeline failed");
                metrics::SEARCH_ERRORS.with_label_values(&["pipeline"]).inc();
                metrics::SEARCH_DURATION
                    .with_label_values(&["error"])
                    .observe(elapsed);
                SearchResponse {
                    success: false,
                    message: format!(
                        "The search for \"{}\" ran into a problem. Please try again in a moment.",
                        options.query
                    ),
                    links: vec![],
                    search_suggestion: Some(refine_suggestion(options.resource_type)),
                    from_cache: None,
                }
            }
        }
    }

    /// Run the same pipeline, delivered as a cancellable sequence of
    /// batches.
    pub fn search_progressive(&self, options: SearchOptions) -> ProgressiveSearch {
        ProgressiveSearch::new(self.clone(), options)
    }

    /// "More like this": a pre-filtered pass-through to the provider's
    /// find-similar capability, restricted to trusted domains.
    pub async fn find_similar(
        &self,
        url: &str,
        num_results: usize,
        resource_type: ResourceType,
    ) -> Vec<DiySearchResult> {
        let mut query = ProviderQuery::neural("", num_results.max(1));
        query.use_autoprompt = false;
        query.include_domains = Some(trusted_domains(resource_type));

        match self.provider.find_similar(url, &query).await {
            Ok(candidates) => {
                let kept =
                    prefilter_candidates(candidates, "", resource_type, ContentKind::Mixed);
                kept.iter()
                    .filter_map(|c| process_candidate(c, "", resource_type))
                    .take(num_results)
                    .collect()
            }
            Err(e) => {
                warn!(error = %e, url = url, "Find-similar failed");
                metrics::SEARCH_ERRORS.with_label_values(&["strategy"]).inc();
                vec![]
            }
        }
    }

    async fn search_inner(
        &self,
        options: &SearchOptions,
    ) -> Result<SearchResponse, SearchError> {
        let num_results = options.num_results.max(1);

        self.cache.track_query(&options.query).await;

        let optimized = optimize_query(
            &options.query,
            options.resource_type,
            options.project_context.as_ref(),
        );
        if optimized != options.query.trim().to_lowercase() {
            metrics::QUERIES_OPTIMIZED.inc();
        }

        // Cache lookup uses the original query, not the optimized one, so a
        // repeated user request hits regardless of optimizer changes.
        let project_id = options.project_id();
        if let Some(cached) = self
            .cache
            .get(
                &options.query,
                options.resource_type,
                options.content_type,
                &project_id,
            )
            .await
        {
            if cached.len() >= num_results {
                metrics::CACHE_HITS.inc();
                debug!(query = %options.query, "Cache hit");
                let links: Vec<DiySearchResult> =
                    cached.into_iter().take(num_results).collect();
                return Ok(SearchResponse {
                    success: true,
                    message: format!(
                        "Found {} saved resources for \"{}\"",
                        links.len(),
                        options.query
                    ),
                    links,
                    search_suggestion: None,
                    from_cache: Some(true),
                });
            }
        }
        metrics::CACHE_MISSES.inc();

        let contextual = build_contextual_query(&optimized, options);
        debug!(optimized = %optimized, contextual = %contextual, "Built search queries");

        let key = DedupKey {
            query: optimized.clone(),
            resource_type: options.resource_type,
            content_type: options.content_type,
            num_results,
        };
        let merged = {
            let provider = Arc::clone(&self.provider);
            let options = options.clone();
            let contextual = contextual.clone();
            let optimized = optimized.clone();
            let config = self.config.clone();
            self.dedup
                .run(key, async move {
                    execute_search_unit(provider, options, contextual, optimized, config).await
                })
                .await?
        };

        if merged.is_empty() {
            return Ok(SearchResponse {
                success: false,
                message: format!("No how-to resources found for \"{}\"", options.query),
                links: vec![],
                search_suggestion: Some(refine_suggestion(options.resource_type)),
                from_cache: None,
            });
        }

        // Validate everything, then partition.
        let mut relevant: Vec<DiySearchResult> = Vec::new();
        let mut non_relevant: Vec<DiySearchResult> = Vec::new();
        for mut result in merged {
            let validation = validate_result(
                &result,
                &options.query,
                options.project_context.as_ref(),
                options.resource_type,
                &self.config.relevance,
            );
            let is_relevant = validation.is_relevant;
            apply_validation(&mut result, validation);
            if is_relevant {
                relevant.push(result);
            } else {
                non_relevant.push(result);
            }
        }

        let relevant_count = relevant.len();
        let target = (self.config.relevant_target_ratio * num_results as f32).ceil() as usize;
        let floor = (self.config.relevant_floor_ratio * num_results as f32).ceil() as usize;

        let mut pool = relevant;
        if relevant_count < target {
            debug!(
                relevant = relevant_count,
                target = target,
                "Backfilling with non-relevant results"
            );
            non_relevant.sort_by(|a, b| {
                b.relevance_score
                    .partial_cmp(&a.relevance_score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            for result in non_relevant {
                if pool.len() >= num_results {
                    break;
                }
                pool.push(result);
            }
        }

        if relevant_count < floor {
            info!(
                relevant = relevant_count,
                floor = floor,
                query = %options.query,
                "Escalating to backup strategies"
            );
            let backup = run_backup_ladder(
                Arc::clone(&self.provider),
                options,
                &optimized,
                &self.config,
            )
            .await;

            let known: HashSet<String> = pool.iter().map(|r| r.url.clone()).collect();
            for mut result in backup {
                if known.contains(&result.url) {
                    continue;
                }
                let validation = validate_result(
                    &result,
                    &options.query,
                    options.project_context.as_ref(),
                    options.resource_type,
                    &self.config.relevance,
                );
                apply_validation(&mut result, validation);
                pool.push(result);
            }
        }

        let balanced = balance_results(pool, options);

        self.cache
            .set(
                &options.query,
                options.resource_type,
                options.content_type,
                &project_id,
                &balanced,
            )
            .await;

        if let Some(history) = &self.history {
            history
                .record_search(SearchRecord::new(
                    &options.query,
                    options.resource_type,
                    options.content_type,
                    balanced.len(),
                    &project_id,
                ))
                .await;
        }

        let search_suggestion =
            (balanced.len() < num_results).then(|| refine_suggestion(options.resource_type));

        Ok(SearchResponse {
            success: true,
            message: format!(
                "Found {} how-to resources for \"{}\"",
                balanced.len(),
                options.query
            ),
            links: balanced,
            search_suggestion,
            from_cache: Some(false),
        })
    }
}

/// The deduplicated search unit: strategy fan-out, per-strategy processing,
/// merge by URL.
async fn execute_search_unit(
    provider: Arc<dyn SearchProvider>,
    options: SearchOptions,
    contextual: String,
    optimized: String,
    config: OrchestratorConfig,
) -> Result<Vec<DiySearchResult>, SearchError> {
    let num_results = options.num_results.max(1);
    let mut plans: Vec<(&'static str, String, usize)> = Vec::new();

    if num_results >= 3 {
        plans.push((
            "main",
            contextual.clone(),
            share_of(num_results, config.main_share, config.min_strategy_results),
        ));

        let simplified = simplify_query(&contextual);
        if contextual.len() > config.simplified_min_query_len && simplified != contextual {
            plans.push((
                "simplified",
                simplified,
                share_of(num_results, config.simplified_share, config.min_strategy_results),
            ));
        }

        if options.content_type == ContentKind::Visual
            && options.resource_type == ResourceType::Inspiration
        {
            plans.push((
                "visual",
                visual_query(&optimized),
                share_of(num_results, config.visual_share, config.min_strategy_results),
            ));
        }
    } else {
        plans.push(("direct", contextual.clone(), num_results));
    }

    debug!(strategies = plans.len(), query = %optimized, "Running search strategies");

    let strategy_futures = plans.into_iter().map(|(name, query, count)| {
        let provider = Arc::clone(&provider);
        let filter_query = optimized.clone();
        let resource_type = options.resource_type;
        let content_type = options.content_type;
        async move {
            run_strategy(
                provider.as_ref(),
                name,
                &query,
                count,
                &filter_query,
                resource_type,
                content_type,
            )
            .await
        }
    });

    let outcomes = join_all(strategy_futures).await;

    let failed = outcomes.iter().filter(|o| o.failed).count();
    if failed == outcomes.len() {
        return Err(SearchError::AllStrategiesFailed {
            query: options.query.clone(),
        });
    }

    // Merge by URL, first-seen wins.
    let mut seen = HashSet::new();
    let mut merged = Vec::new();
    for outcome in outcomes {
        for result in outcome.results {
            if seen.insert(result.url.clone()) {
                merged.push(result);
            }
        }
    }

    debug!(merged = merged.len(), "Strategies merged");
    Ok(merged)
}

/// Run a single strategy end to end: provider call, pre-filter, processing.
/// An upstream failure degrades to an empty contribution.
pub(crate) async fn run_strategy(
    provider: &dyn SearchProvider,
    name: &str,
    query: &str,
    count: usize,
    filter_query: &str,
    resource_type: ResourceType,
    content_type: ContentKind,
) -> StrategyOutcome {
    let provider_query = ProviderQuery::neural(query, count);

    match provider.search(&provider_query).await {
        Ok(candidates) => {
            let kept = prefilter_candidates(candidates, filter_query, resource_type, content_type);
            let results: Vec<DiySearchResult> = kept
                .iter()
                .filter_map(|c| process_candidate(c, filter_query, resource_type))
                .collect();
            debug!(strategy = name, results = results.len(), "Strategy complete");
            StrategyOutcome {
                results,
                failed: false,
            }
        }
        Err(e) => {
            warn!(strategy = name, error = %e, "Strategy failed");
            metrics::SEARCH_ERRORS.with_label_values(&["strategy"]).inc();
            StrategyOutcome {
                results: vec![],
                failed: true,
            }
        }
    }
}

fn share_of(num_results: usize, share: f32, minimum: usize) -> usize {
    ((num_results as f32 * share).ceil() as usize).max(minimum)
}

/// Actionable refinement hint shown when a search comes back thin.
fn refine_suggestion(resource_type: ResourceType) -> String {
    match resource_type {
        ResourceType::Tutorial => {
            "Try a simpler phrase, like \"fix leaky faucet\" or \"paint cabinets\".".to_string()
        }
        ResourceType::Inspiration => {
            "Try broader terms, like \"small bathroom ideas\".".to_string()
        }
        ResourceType::Materials => {
            "Try naming the exact material or tool, like \"2x4 lumber\".".to_string()
        }
    }
}
