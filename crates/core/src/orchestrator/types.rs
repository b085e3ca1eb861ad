//! Types for the search orchestration pipeline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::provider::ProviderError;

/// What kind of resource the caller is looking for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Tutorial,
    Inspiration,
    Materials,
}

impl ResourceType {
    /// Stable label used in cache/dedup keys and log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Tutorial => "tutorial",
            ResourceType::Inspiration => "inspiration",
            ResourceType::Materials => "materials",
        }
    }
}

/// Desired content mix for the result set.
///
/// Also used as the classification output for individual results.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Video,
    Visual,
    Article,
    #[default]
    Mixed,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Video => "video",
            ContentKind::Visual => "visual",
            ContentKind::Article => "article",
            ContentKind::Mixed => "mixed",
        }
    }
}

/// Visual quality classification derived from text signals.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VisualQuality {
    High,
    Medium,
    Low,
}

/// Optional project the caller is working on.
///
/// Used to enrich queries and to score result relevance. All fields other
/// than the title are optional.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProjectContext {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub materials: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub focus_areas: Vec<String>,
}

impl ProjectContext {
    /// Short stable fingerprint of the project identity, for cache keys.
    pub fn fingerprint(&self) -> String {
        let digest = md5::compute(self.title.trim().to_lowercase().as_bytes());
        format!("{:x}", digest)[..8].to_string()
    }
}

/// One search request. Immutable for the duration of the call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Free-text query.
    pub query: String,
    /// What kind of resource to look for.
    pub resource_type: ResourceType,
    /// How many links to return (default: 5).
    #[serde(default = "default_num_results")]
    pub num_results: usize,
    /// Desired content mix (default: mixed).
    #[serde(default)]
    pub content_type: ContentKind,
    /// Whether the caller intends progressive (batched) delivery.
    #[serde(default)]
    pub progressive: bool,
    /// Optional project the search is for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_context: Option<ProjectContext>,
}

fn default_num_results() -> usize {
    5
}

impl SearchOptions {
    /// Minimal options for a plain query.
    pub fn new(query: impl Into<String>, resource_type: ResourceType) -> Self {
        Self {
            query: query.into(),
            resource_type,
            num_results: default_num_results(),
            content_type: ContentKind::Mixed,
            progressive: false,
            project_context: None,
        }
    }

    /// Cache project identity: short hash of the project title, or "global".
    pub fn project_id(&self) -> String {
        self.project_context
            .as_ref()
            .map(|p| p.fingerprint())
            .unwrap_or_else(|| "global".to_string())
    }
}

/// A processed how-to resource link.
///
/// Created once per raw candidate during classification; the only fields
/// written afterwards are the validation ones (`relevance_score`,
/// `validation_reasons`, `is_validated`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiySearchResult {
    pub title: String,
    /// Unique key for deduplication across strategies and batches.
    pub url: String,
    /// Snippet capped at 300 chars, ellipsized.
    pub snippet: String,
    /// Human label derived from the domain ("YouTube", "Instructables", ...).
    pub source: String,
    pub difficulty: String,
    /// Up to 8 descriptive tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub is_youtube: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    /// Provider relevance score, clamped to 0..=1.
    pub score: f32,
    pub content_type: ContentKind,
    pub visual_quality: VisualQuality,
    pub has_images: bool,
    pub image_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub content_length: usize,
    pub language: String,
    pub is_pinterest: bool,
    pub is_gallery: bool,
    pub has_before_after: bool,
    /// Filled in by relevance validation.
    #[serde(default)]
    pub relevance_score: f32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation_reasons: Vec<String>,
    #[serde(default)]
    pub is_validated: bool,
}

/// Response of a non-progressive search. Never an error: failures are
/// reported through `success = false` plus a human-readable message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub success: bool,
    pub message: String,
    pub links: Vec<DiySearchResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_suggestion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_cache: Option<bool>,
}

/// One batch of a progressive search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressiveSearchResult {
    pub batch_index: usize,
    pub total_batches: usize,
    pub batch_size: usize,
    pub is_complete: bool,
    pub results: Vec<DiySearchResult>,
    pub elapsed_ms: u64,
}

/// Internal pipeline error. `Clone` so deduplicated waiters all observe the
/// identical outcome.
#[derive(Debug, Clone, Error)]
pub enum SearchError {
    #[error("search provider failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("all search strategies failed for \"{query}\"")]
    AllStrategiesFailed { query: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_options_defaults_from_json() {
        let json = r#"{"query": "fix leaky faucet", "resource_type": "tutorial"}"#;
        let options: SearchOptions = serde_json::from_str(json).unwrap();

        assert_eq!(options.query, "fix leaky faucet");
        assert_eq!(options.resource_type, ResourceType::Tutorial);
        assert_eq!(options.num_results, 5);
        assert_eq!(options.content_type, ContentKind::Mixed);
        assert!(!options.progressive);
        assert!(options.project_context.is_none());
    }

    #[test]
    fn test_project_id_global_without_context() {
        let options = SearchOptions::new("test", ResourceType::Tutorial);
        assert_eq!(options.project_id(), "global");
    }

    #[test]
    fn test_project_fingerprint_stable_and_short() {
        let project = ProjectContext {
            title: "Garden Bench".to_string(),
            ..Default::default()
        };
        let a = project.fingerprint();
        let b = project.fingerprint();

        assert_eq!(a, b);
        assert_eq!(a.len(), 8);
    }

    #[test]
    fn test_project_fingerprint_ignores_case_and_whitespace() {
        let a = ProjectContext {
            title: "Garden Bench".to_string(),
            ..Default::default()
        };
        let b = ProjectContext {
            title: "  garden bench ".to_string(),
            ..Default::default()
        };
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_resource_type_serialization() {
        assert_eq!(
            serde_json::to_string(&ResourceType::Tutorial).unwrap(),
            "\"tutorial\""
        );
        assert_eq!(
            serde_json::to_string(&ContentKind::Mixed).unwrap(),
            "\"mixed\""
        );
    }

    #[test]
    fn test_search_response_skips_empty_optionals() {
        let response = SearchResponse {
            success: true,
            message: "ok".to_string(),
            links: vec![],
            search_suggestion: None,
            from_cache: None,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("search_suggestion"));
        assert!(!json.contains("from_cache"));
    }
}
