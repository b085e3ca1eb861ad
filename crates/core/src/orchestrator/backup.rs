//! Backup-strategy escalation ladder.
//!
//! Invoked only when the primary strategies leave the result set too thin.
//! Every rung runs regardless of what the previous one found; the combined
//! output accumulates and is deduplicated by URL before returning.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::metrics;
use crate::provider::SearchProvider;
use crate::query::{content_terms, resource_terms};

use super::config::OrchestratorConfig;
use super::runner::run_strategy;
use super::types::{DiySearchResult, ResourceType, SearchOptions};

/// Request phrasing stripped by the backup simplification. Deliberately a
/// different list from the parallel-strategy one: by the time we are here,
/// the query has already been through that pass.
const BACKUP_FILLER_PHRASES: &[&str] = &[
    "i want to",
    "i need to",
    "looking for",
    "ways to",
    "ideas for",
    "help with",
    "for my home",
];

/// Run the three backup rungs and return their deduplicated union.
pub(crate) async fn run_backup_ladder(
    provider: Arc<dyn SearchProvider>,
    options: &SearchOptions,
    optimized: &str,
    config: &OrchestratorConfig,
) -> Vec<DiySearchResult> {
    metrics::BACKUP_INVOCATIONS.inc();
    let cap = config.backup_strategy_cap;

    let mut queries: Vec<(&'static str, String)> = Vec::new();

    if let Some(query) = simplified_backup_query(optimized, options) {
        queries.push(("backup-simplified", query));
    }

    if let Some(project) = &options.project_context {
        let title = project.title.trim().to_lowercase();
        if !title.is_empty() {
            queries.push(("backup-project", project_title_query(&title, options)));
        }
    }

    queries.push(("backup-generic", generic_query(options.resource_type)));

    let mut seen: HashSet<String> = HashSet::new();
    let mut combined: Vec<DiySearchResult> = Vec::new();

    for (name, query) in queries {
        debug!(strategy = name, query = %query, "Backup rung");
        let outcome = run_strategy(
            provider.as_ref(),
            name,
            &query,
            cap,
            &query,
            options.resource_type,
            options.content_type,
        )
        .await;

        for result in outcome.results {
            if seen.insert(result.url.clone()) {
                combined.push(result);
            }
        }
    }

    debug!(results = combined.len(), "Backup ladder complete");
    combined
}

/// Rung 1: strip backup filler phrases; fall back to the project title when
/// the remainder is too short to search.
fn simplified_backup_query(optimized: &str, options: &SearchOptions) -> Option<String> {
    let mut simplified = optimized.to_lowercase();
    for phrase in BACKUP_FILLER_PHRASES {
        simplified = simplified.replace(phrase, " ");
    }
    let simplified = simplified.split_whitespace().collect::<Vec<_>>().join(" ");

    if simplified.len() >= 3 {
        return Some(simplified);
    }

    options
        .project_context
        .as_ref()
        .map(|p| p.title.trim().to_lowercase())
        .filter(|t| t.len() >= 3)
}

/// Rung 2: project title combined with resource/content steering terms.
fn project_title_query(title: &str, options: &SearchOptions) -> String {
    let mut parts = vec![title.to_string()];
    if let Some(term) = resource_terms(options.resource_type).first() {
        parts.push(term.to_string());
    }
    if let Some(term) = content_terms(options.content_type).first() {
        parts.push(term.to_string());
    }
    parts.join(" ")
}

/// Rung 3: fully generic, last resort.
fn generic_query(resource_type: ResourceType) -> String {
    match resource_type {
        ResourceType::Tutorial => "diy home improvement tutorial".to_string(),
        ResourceType::Inspiration => "diy home improvement ideas".to_string(),
        ResourceType::Materials => "diy home improvement materials supplies".to_string(),
    }
}
