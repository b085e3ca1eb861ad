//! Query optimization.
//!
//! Normalizes and enriches raw query text before it reaches the upstream
//! provider. Optimization must never produce a query too short to search:
//! anything under three characters falls back to the original input.

use crate::orchestrator::{ProjectContext, ResourceType, SearchOptions};

use super::terms::{content_terms, context_phrase, phrase_synonyms, resource_terms};

/// Filler words stripped from long queries, word-boundary and
/// case-insensitive.
const FILLER_WORDS: &[&str] = &[
    "i", "want", "need", "would", "like", "some", "help", "with", "me", "please", "can", "you",
    "looking", "for", "show", "find", "get",
];

/// Request phrases stripped by the simplified parallel strategy.
const FILLER_PHRASES: &[&str] = &[
    "how to",
    "how do i",
    "best way to",
    "easy ways to",
    "step by step",
    "i want to",
    "help me",
];

/// Queries longer than this get the filler-word pass.
const FILLER_THRESHOLD: usize = 30;

/// Focus areas longer than this are considered too wordy to append.
const MAX_FOCUS_LEN: usize = 15;

/// Optimize a raw query for the upstream provider.
///
/// Lower-cases and trims, strips filler from long queries, folds in a little
/// project context, and appends a resource-type phrase when none of its
/// synonyms is already present.
pub fn optimize_query(
    raw_query: &str,
    resource_type: ResourceType,
    project: Option<&ProjectContext>,
) -> String {
    let mut query = raw_query.trim().to_lowercase();

    if query.len() > FILLER_THRESHOLD {
        query = strip_words(&query, FILLER_WORDS);
    }

    if let Some(project) = project {
        for material in project.materials.iter().take(2) {
            let material = material.trim().to_lowercase();
            if !material.is_empty() && !query.contains(&material) {
                query.push(' ');
                query.push_str(&material);
            }
        }
        if let Some(focus) = project
            .focus_areas
            .iter()
            .map(|f| f.trim().to_lowercase())
            .find(|f| !f.is_empty() && f.len() < MAX_FOCUS_LEN && !query.contains(f.as_str()))
        {
            query.push(' ');
            query.push_str(&focus);
        }
    }

    if let Some(phrase) = context_phrase(resource_type) {
        let already_present = phrase_synonyms(phrase).iter().any(|s| query.contains(s));
        if !already_present {
            query.push(' ');
            query.push_str(phrase);
        }
    }

    let query = collapse_whitespace(&query);

    // Never hand the provider something too short to mean anything.
    if query.len() < 3 {
        raw_query.to_string()
    } else {
        query
    }
}

/// Build the contextual query used by the main search strategy.
///
/// Layers content-type and resource-type steering terms plus filtered
/// project context on top of the optimized query, ending with a generic
/// domain suffix.
pub fn build_contextual_query(optimized: &str, options: &SearchOptions) -> String {
    let mut parts: Vec<String> = vec![optimized.to_string()];

    for term in content_terms(options.content_type).iter().take(2) {
        if !optimized.contains(term) {
            parts.push(term.to_string());
        }
    }

    if let Some(term) = resource_terms(options.resource_type)
        .iter()
        .find(|t| !optimized.contains(*t))
    {
        parts.push(term.to_string());
    }

    if let Some(project) = &options.project_context {
        if let Some(goal) = &project.goal {
            let goal = goal.trim();
            if !goal.is_empty() && goal.len() < 40 {
                parts.push(goal.to_lowercase());
            }
        }
        for focus in &project.focus_areas {
            let lower = focus.trim().to_lowercase();
            let too_vague = lower.contains("specific") || lower.contains("particular");
            if !lower.is_empty() && lower.len() < MAX_FOCUS_LEN && !too_vague {
                parts.push(lower);
                break;
            }
        }
    }

    parts.push("diy home improvement".to_string());
    collapse_whitespace(&parts.join(" "))
}

/// Strip request phrasing from a query for the simplified parallel strategy.
///
/// Returns the query unchanged when stripping would leave nothing useful.
pub fn simplify_query(query: &str) -> String {
    let mut simplified = query.to_lowercase();
    for phrase in FILLER_PHRASES {
        simplified = simplified.replace(phrase, " ");
    }
    let simplified = collapse_whitespace(&simplified);

    if simplified.len() < 3 {
        query.to_string()
    } else {
        simplified
    }
}

/// Query for the visual-specific parallel strategy.
pub fn visual_query(optimized: &str) -> String {
    collapse_whitespace(&format!("{optimized} photos gallery before and after"))
}

fn strip_words(query: &str, words: &[&str]) -> String {
    let kept: Vec<&str> = query
        .split_whitespace()
        .filter(|w| {
            let bare = w.trim_matches(|c: char| !c.is_alphanumeric());
            !words.iter().any(|f| f.eq_ignore_ascii_case(bare))
        })
        .collect();
    kept.join(" ")
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_query_keeps_filler() {
        // Under the threshold: no filler stripping, just the phrase append.
        let optimized = optimize_query("fix leaky faucet", ResourceType::Tutorial, None);
        assert_eq!(optimized, "fix leaky faucet tutorial");
    }

    #[test]
    fn test_long_query_strips_filler() {
        let optimized = optimize_query(
            "i would like some help with fixing my old leaky bathroom faucet",
            ResourceType::Tutorial,
            None,
        );
        assert!(!optimized.contains("would"));
        assert!(!optimized.contains("help"));
        assert!(optimized.contains("leaky"));
        assert!(optimized.contains("faucet"));
    }

    #[test]
    fn test_phrase_not_duplicated_when_synonym_present() {
        let optimized = optimize_query("how to fix leaky faucet", ResourceType::Tutorial, None);
        assert!(!optimized.ends_with("tutorial"));
    }

    #[test]
    fn test_materials_gets_no_phrase() {
        let optimized = optimize_query("copper pipe fittings", ResourceType::Materials, None);
        assert_eq!(optimized, "copper pipe fittings");
    }

    #[test]
    fn test_project_materials_and_focus_appended() {
        let project = ProjectContext {
            title: "Bathroom refresh".to_string(),
            materials: vec!["Plywood".to_string(), "wood glue".to_string(), "screws".to_string()],
            focus_areas: vec!["a very long focus area name".to_string(), "sanding".to_string()],
            ..Default::default()
        };
        let optimized = optimize_query("build shelf", ResourceType::Tutorial, Some(&project));

        // Only the first two materials and the first short focus area.
        assert!(optimized.contains("plywood"));
        assert!(optimized.contains("wood glue"));
        assert!(!optimized.contains("screws"));
        assert!(optimized.contains("sanding"));
        assert!(!optimized.contains("very long"));
    }

    #[test]
    fn test_optimizer_never_returns_too_short() {
        // Everything is filler, so the pass would leave an empty string.
        let raw = "i would like some help with you can find for me please";
        let optimized = optimize_query(raw, ResourceType::Materials, None);
        assert_eq!(optimized, raw);
    }

    #[test]
    fn test_optimizer_is_deterministic() {
        let a = optimize_query("fix leaky faucet", ResourceType::Tutorial, None);
        let b = optimize_query("fix leaky faucet", ResourceType::Tutorial, None);
        assert_eq!(a, b);
    }

    #[test]
    fn test_contextual_query_appends_domain_suffix() {
        let options = SearchOptions::new("fix leaky faucet", ResourceType::Tutorial);
        let contextual = build_contextual_query("fix leaky faucet tutorial", &options);
        assert!(contextual.ends_with("diy home improvement"));
    }

    #[test]
    fn test_contextual_query_filters_vague_focus_areas() {
        let mut options = SearchOptions::new("paint cabinet", ResourceType::Inspiration);
        options.project_context = Some(ProjectContext {
            title: "Kitchen".to_string(),
            focus_areas: vec!["specific hinges".to_string(), "color".to_string()],
            ..Default::default()
        });
        let contextual = build_contextual_query("paint cabinet", &options);
        assert!(!contextual.contains("specific hinges"));
        assert!(contextual.contains("color"));
    }

    #[test]
    fn test_simplify_strips_request_phrases() {
        assert_eq!(
            simplify_query("how to fix a leaky faucet"),
            "fix a leaky faucet"
        );
        assert_eq!(
            simplify_query("best way to paint cabinets"),
            "paint cabinets"
        );
    }

    #[test]
    fn test_simplify_falls_back_when_everything_is_filler() {
        assert_eq!(simplify_query("how to"), "how to");
    }

    #[test]
    fn test_visual_query_shape() {
        let q = visual_query("small bathroom remodel");
        assert!(q.starts_with("small bathroom remodel"));
        assert!(q.contains("gallery"));
    }
}
