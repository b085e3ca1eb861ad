//! Relevance validation.
//!
//! Scores a processed result against the original query and project
//! context. The weights preserve the shape of the scoring (weighted
//! term-overlap plus domain bonuses, minus a penalty for off-topic terms);
//! the exact numbers are tunable, and tests assert relative orderings only.

use tracing::trace;

use crate::orchestrator::{DiySearchResult, ProjectContext, ResourceType};
use crate::query::{resource_terms, significant_terms};

/// Tunable scoring weights.
#[derive(Debug, Clone)]
pub struct RelevanceWeights {
    /// Flat bonus when enough of the query's words appear in the result.
    pub query_coverage_bonus: f32,
    /// Coverage ratio required for the flat bonus.
    pub query_coverage_ratio: f32,
    /// Per matched project-title word.
    pub title_word: f32,
    /// Per matched project material.
    pub material: f32,
    /// Per matched focus area.
    pub focus_area: f32,
    /// Per matched general DIY term.
    pub diy_term: f32,
    /// Per matched resource-type term.
    pub resource_term: f32,
    /// Per matched unrelated-domain term (subtracted).
    pub unrelated_domain_penalty: f32,
    /// Minimum score for a result to count as relevant.
    pub min_score: f32,
    /// Minimum query-word ratio for a result to count as relevant.
    pub min_query_ratio: f32,
}

impl Default for RelevanceWeights {
    fn default() -> Self {
        Self {
            query_coverage_bonus: 40.0,
            query_coverage_ratio: 0.3,
            title_word: 15.0,
            material: 10.0,
            focus_area: 8.0,
            diy_term: 3.0,
            resource_term: 5.0,
            unrelated_domain_penalty: 20.0,
            min_score: 25.0,
            min_query_ratio: 0.1,
        }
    }
}

/// General DIY vocabulary; weak positive signal.
const DIY_TERMS: &[&str] = &[
    "diy", "repair", "fix", "build", "install", "renovate", "restore", "upgrade", "paint",
    "tool", "project", "wood", "tile", "plumbing", "drywall", "sand", "drill",
];

/// Vocabulary of domains this engine is explicitly not about; each match is
/// a negative signal.
const UNRELATED_DOMAIN_TERMS: &[&str] = &[
    // recipes
    "recipe", "ingredients", "baking", "cooking time",
    // travel
    "travel", "vacation", "flight", "hotel", "itinerary",
    // fashion
    "fashion", "outfit", "wardrobe", "runway",
    // entertainment
    "celebrity", "movie review", "box office", "episode recap",
    // sports
    "football", "basketball", "league", "playoffs",
    // software
    "software download", "app store", "programming", "source code",
    // automotive
    "car dealership", "horsepower", "test drive",
];

/// Outcome of validating one result.
#[derive(Debug, Clone)]
pub struct Validation {
    pub score: f32,
    pub reasons: Vec<String>,
    pub is_relevant: bool,
}

/// Score a result against the original query and project context.
pub fn validate_result(
    result: &DiySearchResult,
    original_query: &str,
    project: Option<&ProjectContext>,
    resource_type: ResourceType,
    weights: &RelevanceWeights,
) -> Validation {
    let haystack = format!(
        "{} {}",
        result.title.to_lowercase(),
        result.snippet.to_lowercase()
    );

    let mut score = 0.0f32;
    let mut reasons = Vec::new();

    let query_words = significant_terms(original_query);
    let matched_query_words = query_words
        .iter()
        .filter(|w| haystack.contains(w.as_str()))
        .count();
    let query_ratio = if query_words.is_empty() {
        0.0
    } else {
        matched_query_words as f32 / query_words.len() as f32
    };

    if query_ratio > weights.query_coverage_ratio {
        score += weights.query_coverage_bonus;
        reasons.push(format!(
            "matches {matched_query_words} of {} query words",
            query_words.len()
        ));
    }

    if let Some(project) = project {
        let title_matches = significant_terms(&project.title)
            .iter()
            .filter(|w| haystack.contains(w.as_str()))
            .count();
        if title_matches > 0 {
            score += title_matches as f32 * weights.title_word;
            reasons.push(format!("overlaps project title ({title_matches} words)"));
        }

        let material_matches = project
            .materials
            .iter()
            .filter(|m| haystack.contains(&m.trim().to_lowercase()))
            .count();
        if material_matches > 0 {
            score += material_matches as f32 * weights.material;
            reasons.push(format!("mentions {material_matches} project material(s)"));
        }

        let focus_matches = project
            .focus_areas
            .iter()
            .filter(|f| haystack.contains(&f.trim().to_lowercase()))
            .count();
        if focus_matches > 0 {
            score += focus_matches as f32 * weights.focus_area;
            reasons.push(format!("covers {focus_matches} focus area(s)"));
        }
    }

    let diy_matches = DIY_TERMS.iter().filter(|t| haystack.contains(*t)).count();
    if diy_matches > 0 {
        score += diy_matches as f32 * weights.diy_term;
    }

    let resource_matches = resource_terms(resource_type)
        .iter()
        .filter(|t| haystack.contains(*t))
        .count();
    if resource_matches > 0 {
        score += resource_matches as f32 * weights.resource_term;
        reasons.push(format!("{} content", resource_type.as_str()));
    }

    let unrelated_matches = UNRELATED_DOMAIN_TERMS
        .iter()
        .filter(|t| haystack.contains(*t))
        .count();
    if unrelated_matches > 0 {
        score -= unrelated_matches as f32 * weights.unrelated_domain_penalty;
        reasons.push(format!("off-topic signals ({unrelated_matches})"));
    }

    let is_relevant = score >= weights.min_score && query_ratio > weights.min_query_ratio;

    trace!(url = %result.url, score = score, relevant = is_relevant, "Validated result");

    Validation {
        // Raw score can go negative under penalties; report it floored.
        score: score.max(0.0),
        reasons,
        is_relevant,
    }
}

/// Append the validation outcome to a result.
pub fn apply_validation(result: &mut DiySearchResult, validation: Validation) {
    result.relevance_score = validation.score;
    result.validation_reasons = validation.reasons;
    result.is_validated = true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::{ContentKind, VisualQuality};

    fn make_result(title: &str, snippet: &str) -> DiySearchResult {
        DiySearchResult {
            title: title.to_string(),
            url: "https://example.com".to_string(),
            snippet: snippet.to_string(),
            source: "Example".to_string(),
            difficulty: "intermediate".to_string(),
            tags: vec![],
            is_youtube: false,
            video_id: None,
            score: 0.5,
            content_type: ContentKind::Article,
            visual_quality: VisualQuality::Medium,
            has_images: false,
            image_count: 0,
            thumbnail_url: None,
            content_length: 0,
            language: "en".to_string(),
            is_pinterest: false,
            is_gallery: false,
            has_before_after: false,
            relevance_score: 0.0,
            validation_reasons: vec![],
            is_validated: false,
        }
    }

    fn validate(result: &DiySearchResult, query: &str) -> Validation {
        validate_result(
            result,
            query,
            None,
            ResourceType::Tutorial,
            &RelevanceWeights::default(),
        )
    }

    #[test]
    fn test_on_topic_result_is_relevant() {
        let result = make_result(
            "How to Fix a Leaky Faucet",
            "Step by step guide to repair a dripping faucet.",
        );
        let validation = validate(&result, "fix leaky faucet");

        assert!(validation.is_relevant);
        assert!(validation.score > 0.0);
        assert!(!validation.reasons.is_empty());
    }

    #[test]
    fn test_off_topic_result_not_relevant() {
        let result = make_result(
            "Best Pasta Recipe",
            "A quick recipe with simple ingredients.",
        );
        let validation = validate(&result, "fix leaky faucet");
        assert!(!validation.is_relevant);
    }

    #[test]
    fn test_unrelated_terms_strictly_decrease_score() {
        let clean = make_result(
            "Fix a Leaky Faucet",
            "Repair your faucet with basic tools.",
        );
        let polluted = make_result(
            "Fix a Leaky Faucet",
            "Repair your faucet with basic tools. Also try our recipe and travel tips.",
        );

        let clean_score = validate(&clean, "fix leaky faucet").score;
        let polluted_score = validate(&polluted, "fix leaky faucet").score;
        assert!(polluted_score < clean_score);
    }

    #[test]
    fn test_project_context_raises_score() {
        let result = make_result(
            "Refinishing a pine bookshelf",
            "Sanding and staining pine boards.",
        );

        let without = validate(&result, "refinish bookshelf");

        let project = ProjectContext {
            title: "Pine bookshelf".to_string(),
            materials: vec!["pine boards".to_string()],
            focus_areas: vec!["staining".to_string()],
            ..Default::default()
        };
        let with = validate_result(
            &result,
            "refinish bookshelf",
            Some(&project),
            ResourceType::Tutorial,
            &RelevanceWeights::default(),
        );

        assert!(with.score > without.score);
    }

    #[test]
    fn test_reported_score_floored_at_zero() {
        let result = make_result(
            "Football league playoffs",
            "Celebrity travel vacation fashion outfit recap.",
        );
        let validation = validate(&result, "fix leaky faucet");
        assert!(validation.score >= 0.0);
        assert!(!validation.is_relevant);
    }

    #[test]
    fn test_query_ratio_gate() {
        // High absolute score but almost no query-word overlap must not be
        // marked relevant.
        let result = make_result(
            "DIY wood repair project with tools",
            "Build, install, renovate, restore, upgrade, paint.",
        );
        let validation = validate(&result, "fix leaky faucet cartridge replacement");
        assert!(validation.score > 0.0);
        assert!(!validation.is_relevant);
    }

    #[test]
    fn test_apply_validation_marks_result() {
        let mut result = make_result("Fix faucet", "repair guide");
        let validation = validate(&result.clone(), "fix faucet");
        apply_validation(&mut result, validation);
        assert!(result.is_validated);
        assert!(result.relevance_score >= 0.0);
    }
}
