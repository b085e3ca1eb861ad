//! Shared term vocabularies for query building and matching.

use crate::orchestrator::{ContentKind, ResourceType};

/// Terms that steer the upstream provider towards a resource type.
pub fn resource_terms(resource_type: ResourceType) -> &'static [&'static str] {
    match resource_type {
        ResourceType::Tutorial => &["tutorial", "how to", "step by step", "guide"],
        ResourceType::Inspiration => &["ideas", "inspiration", "designs", "examples"],
        ResourceType::Materials => &["materials", "supplies", "tools", "where to buy"],
    }
}

/// Terms that steer the upstream provider towards a content kind.
pub fn content_terms(kind: ContentKind) -> &'static [&'static str] {
    match kind {
        ContentKind::Video => &["video", "youtube"],
        ContentKind::Visual => &["photos", "gallery", "before and after"],
        ContentKind::Article => &["guide", "article"],
        ContentKind::Mixed => &[],
    }
}

/// The short context phrase the optimizer may append.
///
/// Materials queries get no phrase: "materials" tends to pull shopping
/// results ahead of the actual product pages.
pub fn context_phrase(resource_type: ResourceType) -> Option<&'static str> {
    match resource_type {
        ResourceType::Tutorial => Some("tutorial"),
        ResourceType::Inspiration => Some("ideas"),
        ResourceType::Materials => None,
    }
}

/// Synonyms of a context phrase. If any of these already occur in the query,
/// appending the phrase would only add noise.
pub fn phrase_synonyms(phrase: &str) -> &'static [&'static str] {
    match phrase {
        "tutorial" => &[
            "tutorial",
            "how to",
            "how-to",
            "guide",
            "diy",
            "instructions",
            "step by step",
        ],
        "ideas" => &["ideas", "idea", "inspiration", "designs", "examples"],
        _ => &[],
    }
}

/// Significant terms of a query: lowercase alphanumeric words longer than
/// two characters.
pub fn significant_terms(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| s.len() > 2)
        .map(|s| s.to_string())
        .collect()
}
