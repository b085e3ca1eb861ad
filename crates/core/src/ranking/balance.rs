//! Result balancing.
//!
//! Reorders and filters the merged result set to match the caller's desired
//! content mix. Results are first ordered by a composite similarity score,
//! then bucketed: mixed requests round-robin across video/visual/article
//! buckets, typed requests front-load the matching bucket.

use std::collections::HashSet;

use crate::orchestrator::{
    ContentKind, DiySearchResult, ProjectContext, ResourceType, SearchOptions, VisualQuality,
};
use crate::query::significant_terms;

/// Similarity weights; shape matters, exact values are tunable.
const W_PROJECT_TITLE: f32 = 0.3;
const W_GOAL: f32 = 0.25;
const W_DESCRIPTION: f32 = 0.2;
const W_MATERIALS: f32 = 0.15;
const W_FOCUS: f32 = 0.1;
const SOURCE_QUALITY_BONUS: f32 = 0.05;
const RESOURCE_ALIGNMENT_BONUS: f32 = 0.05;
const RELEVANCE_BLEND: f32 = 0.01;

const QUALITY_SOURCES: &[&str] = &[
    "YouTube",
    "Instructables",
    "wikiHow",
    "Family Handyman",
    "This Old House",
];

/// Composite similarity of a result to the request: provider score plus
/// weighted overlap with the project context, small source-quality and
/// resource-alignment bonuses, and a sliver of the relevance score. Capped
/// at 1.0.
pub fn similarity_score(
    result: &DiySearchResult,
    project: Option<&ProjectContext>,
    resource_type: ResourceType,
) -> f32 {
    let haystack = format!(
        "{} {}",
        result.title.to_lowercase(),
        result.snippet.to_lowercase()
    );

    let mut score = result.score;

    if let Some(project) = project {
        score += W_PROJECT_TITLE * word_overlap(&haystack, &project.title);
        if let Some(goal) = &project.goal {
            score += W_GOAL * word_overlap(&haystack, goal);
        }
        if let Some(description) = &project.description {
            score += W_DESCRIPTION * word_overlap(&haystack, description);
        }
        if !project.materials.is_empty() {
            let matched = project
                .materials
                .iter()
                .filter(|m| haystack.contains(&m.trim().to_lowercase()))
                .count();
            score += W_MATERIALS * matched as f32 / project.materials.len() as f32;
        }
        if !project.focus_areas.is_empty() {
            let matched = project
                .focus_areas
                .iter()
                .filter(|f| haystack.contains(&f.trim().to_lowercase()))
                .count();
            score += W_FOCUS * matched as f32 / project.focus_areas.len() as f32;
        }
    }

    if QUALITY_SOURCES.contains(&result.source.as_str()) {
        score += SOURCE_QUALITY_BONUS;
    }

    if aligns_with_resource(&haystack, resource_type) {
        score += RESOURCE_ALIGNMENT_BONUS;
    }

    score += RELEVANCE_BLEND * result.relevance_score / 100.0;

    score.min(1.0)
}

fn word_overlap(haystack: &str, text: &str) -> f32 {
    let words = significant_terms(text);
    if words.is_empty() {
        return 0.0;
    }
    let matched = words.iter().filter(|w| haystack.contains(w.as_str())).count();
    matched as f32 / words.len() as f32
}

fn aligns_with_resource(haystack: &str, resource_type: ResourceType) -> bool {
    let markers: &[&str] = match resource_type {
        ResourceType::Tutorial => &["how to", "tutorial", "guide", "step"],
        ResourceType::Inspiration => &["ideas", "inspiration", "design"],
        ResourceType::Materials => &["buy", "supplies", "materials", "tools"],
    };
    markers.iter().any(|m| haystack.contains(m))
}

/// Balance a merged result set down to `num_results` according to the
/// requested content mix.
pub fn balance_results(
    results: Vec<DiySearchResult>,
    options: &SearchOptions,
) -> Vec<DiySearchResult> {
    let project = options.project_context.as_ref();
    let target = options.num_results.max(1);

    let mut scored: Vec<(f32, DiySearchResult)> = results
        .into_iter()
        .map(|r| (similarity_score(&r, project, options.resource_type), r))
        .collect();
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    let ordered: Vec<DiySearchResult> = scored.into_iter().map(|(_, r)| r).collect();

    match options.content_type {
        ContentKind::Mixed => round_robin(ordered, target),
        requested => prioritize_kind(ordered, requested, target),
    }
}

/// Round-robin across the video / visual / article buckets, skipping
/// duplicate URLs, until the target is reached or every bucket is drained.
fn round_robin(results: Vec<DiySearchResult>, target: usize) -> Vec<DiySearchResult> {
    let mut video = Vec::new();
    let mut visual = Vec::new();
    let mut article = Vec::new();

    for result in results {
        match result.content_type {
            ContentKind::Video => video.push(result),
            ContentKind::Visual => visual.push(result),
            // Mixed-classified pages read like articles with some images.
            ContentKind::Article | ContentKind::Mixed => article.push(result),
        }
    }

    let mut buckets = [video, visual, article];
    for bucket in buckets.iter_mut() {
        bucket.reverse(); // pop() then yields best-first
    }

    let mut seen = HashSet::new();
    let mut balanced = Vec::new();
    while balanced.len() < target && buckets.iter().any(|b| !b.is_empty()) {
        for bucket in buckets.iter_mut() {
            if balanced.len() >= target {
                break;
            }
            while let Some(result) = bucket.pop() {
                if seen.insert(result.url.clone()) {
                    balanced.push(result);
                    break;
                }
            }
        }
    }

    balanced
}

/// Front-load results matching the requested kind, append the remainder,
/// truncate to the target.
fn prioritize_kind(
    results: Vec<DiySearchResult>,
    requested: ContentKind,
    target: usize,
) -> Vec<DiySearchResult> {
    let (mut matching, mut rest): (Vec<_>, Vec<_>) = results
        .into_iter()
        .partition(|r| r.content_type == requested);

    if requested == ContentKind::Visual {
        matching.sort_by(|a, b| {
            visual_priority(b)
                .partial_cmp(&visual_priority(a))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        rest.sort_by(|a, b| {
            visual_priority(b)
                .partial_cmp(&visual_priority(a))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }

    let mut seen = HashSet::new();
    let mut ordered = Vec::new();
    for result in matching.into_iter().chain(rest) {
        if seen.insert(result.url.clone()) {
            ordered.push(result);
        }
        if ordered.len() >= target {
            break;
        }
    }
    ordered
}

/// Secondary quality score used when the caller asked for visual content.
fn visual_priority(result: &DiySearchResult) -> f32 {
    let mut score = 0.0f32;

    if result.content_type == ContentKind::Visual {
        score += 3.0;
    }
    score += match result.visual_quality {
        VisualQuality::High => 2.0,
        VisualQuality::Medium => 1.0,
        VisualQuality::Low => 0.0,
    };
    if result.is_gallery {
        score += 1.5;
    }
    if result.has_before_after {
        score += 1.5;
    }
    if result.is_pinterest {
        score += 1.0;
    }
    score += (result.image_count.min(10) as f32) * 0.2;
    if matches!(result.source.as_str(), "Pinterest" | "Instagram" | "Houzz") {
        score += 1.0;
    }
    if result
        .tags
        .iter()
        .any(|t| t.contains("photo") || t.contains("gallery") || t == "visual")
    {
        score += 0.5;
    }

    // Plain low-quality text pages sink to the bottom of a visual request.
    if result.content_type != ContentKind::Visual && result.visual_quality == VisualQuality::Low {
        score -= 2.0;
    }

    score
}
