//! Content classification.
//!
//! Turns a raw candidate into a processed `DiySearchResult`: content kind,
//! visual quality, image heuristics, source label, snippet, difficulty and
//! tags. Pure, deterministic text analysis over title + snippet + url.

use crate::orchestrator::{ContentKind, DiySearchResult, ResourceType, VisualQuality};
use crate::provider::RawCandidate;
use crate::query::significant_terms;

use super::domain_of;
use super::prefilter::is_likely_non_english;

const MAX_SNIPPET_LEN: usize = 300;
const MAX_TAGS: usize = 8;

/// Indicators that a page is primarily visual.
const VISUAL_INDICATORS: &[&str] = &[
    "gallery",
    "photos",
    "pictures",
    "images",
    "before and after",
    "makeover",
    "transformation",
    "lookbook",
    "tour",
];

const HIGH_QUALITY_WORDS: &[&str] = &[
    "stunning",
    "beautiful",
    "gorgeous",
    "professional",
    "high quality",
    "hd",
    "4k",
];

const MEDIUM_QUALITY_WORDS: &[&str] = &["photos", "pictures", "images", "gallery", "examples"];

const BEFORE_AFTER_WORDS: &[&str] = &[
    "before and after",
    "before & after",
    "before/after",
    "transformation",
    "makeover",
];

/// Process one raw candidate into a search result.
///
/// Returns `None` for malformed candidates (missing or invalid url); these
/// are dropped silently, not errors.
pub fn process_candidate(
    raw: &RawCandidate,
    query: &str,
    resource_type: ResourceType,
) -> Option<DiySearchResult> {
    let domain = domain_of(&raw.url)?;
    if raw.title.trim().is_empty() && raw.text.trim().is_empty() {
        return None;
    }

    let title_lower = raw.title.to_lowercase();
    let text_lower = raw.text.to_lowercase();
    let url_lower = raw.url.to_lowercase();
    let haystack = format!("{title_lower} {text_lower}");

    let video_id = extract_youtube_id(&raw.url);
    let is_youtube = domain == "youtube.com" || domain == "youtu.be";
    let is_pinterest = domain.contains("pinterest");

    let content_type = classify_kind(&url_lower, &title_lower, &haystack, &domain);
    let visual_quality = classify_visual_quality(&haystack);
    let image_count = estimate_image_count(&haystack);
    let has_images = image_count > 0;
    let has_before_after = BEFORE_AFTER_WORDS.iter().any(|w| haystack.contains(w));
    let is_gallery = haystack.contains("gallery") || image_count >= 5 || is_pinterest;

    let thumbnail_url = video_id
        .as_ref()
        .map(|id| format!("https://img.youtube.com/vi/{id}/hqdefault.jpg"));

    let language = if is_likely_non_english(&raw.text) {
        "other".to_string()
    } else {
        "en".to_string()
    };

    Some(DiySearchResult {
        title: if raw.title.trim().is_empty() {
            domain.clone()
        } else {
            raw.title.trim().to_string()
        },
        url: raw.url.clone(),
        snippet: make_snippet(&raw.text),
        source: source_label(&domain),
        difficulty: classify_difficulty(&haystack),
        tags: extract_tags(query, &haystack, resource_type, content_type),
        is_youtube,
        video_id,
        score: raw.score.clamp(0.0, 1.0),
        content_type,
        visual_quality,
        has_images,
        image_count,
        thumbnail_url,
        content_length: raw.text.len(),
        language,
        is_pinterest,
        is_gallery,
        has_before_after,
        relevance_score: 0.0,
        validation_reasons: vec![],
        is_validated: false,
    })
}

fn classify_kind(url: &str, title: &str, haystack: &str, domain: &str) -> ContentKind {
    let is_video_url = url.contains("youtube.com")
        || url.contains("youtu.be")
        || url.contains("vimeo.com");
    if is_video_url || title.contains("video") || title.contains("watch:") {
        return ContentKind::Video;
    }

    if domain.contains("pinterest") || domain.contains("houzz") {
        return ContentKind::Visual;
    }

    let indicator_hits = VISUAL_INDICATORS
        .iter()
        .filter(|w| haystack.contains(*w))
        .count();
    match indicator_hits {
        0 => ContentKind::Article,
        1 => ContentKind::Mixed,
        _ => ContentKind::Visual,
    }
}

fn classify_visual_quality(haystack: &str) -> VisualQuality {
    if HIGH_QUALITY_WORDS.iter().any(|w| haystack.contains(w)) {
        VisualQuality::High
    } else if MEDIUM_QUALITY_WORDS.iter().any(|w| haystack.contains(w)) {
        VisualQuality::Medium
    } else {
        VisualQuality::Low
    }
}

/// Heuristic point accumulation for how image-rich a page looks.
fn estimate_image_count(haystack: &str) -> u32 {
    let mut points = 0u32;

    if haystack.contains("gallery") || haystack.contains("photos") {
        points += 5;
    }
    if haystack.contains("step by step")
        && (haystack.contains("with pictures") || haystack.contains("with images"))
    {
        points += 3;
    }
    if BEFORE_AFTER_WORDS.iter().any(|w| haystack.contains(w)) {
        points += 2;
    }

    let any_indicator = points > 0
        || haystack.contains("image")
        || haystack.contains("picture")
        || haystack.contains("photo");
    if points == 0 && any_indicator {
        points = 1;
    }

    points
}

fn classify_difficulty(haystack: &str) -> String {
    const BEGINNER: &[&str] = &["beginner", "easy", "simple", "quick", "basic"];
    const ADVANCED: &[&str] = &["advanced", "expert", "professional", "complex"];

    if BEGINNER.iter().any(|w| haystack.contains(w)) {
        "beginner".to_string()
    } else if ADVANCED.iter().any(|w| haystack.contains(w)) {
        "advanced".to_string()
    } else {
        "intermediate".to_string()
    }
}

fn make_snippet(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= MAX_SNIPPET_LEN {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(MAX_SNIPPET_LEN - 3).collect();
    format!("{}...", cut.trim_end())
}

/// Human label for a domain: known sites get their proper name, everything
/// else gets a capitalized second-level domain.
fn source_label(domain: &str) -> String {
    const KNOWN: &[(&str, &str)] = &[
        ("youtube.com", "YouTube"),
        ("youtu.be", "YouTube"),
        ("vimeo.com", "Vimeo"),
        ("pinterest.com", "Pinterest"),
        ("instagram.com", "Instagram"),
        ("instructables.com", "Instructables"),
        ("wikihow.com", "wikiHow"),
        ("familyhandyman.com", "Family Handyman"),
        ("thisoldhouse.com", "This Old House"),
        ("bobvila.com", "Bob Vila"),
        ("thespruce.com", "The Spruce"),
        ("hgtv.com", "HGTV"),
        ("houzz.com", "Houzz"),
        ("homedepot.com", "The Home Depot"),
        ("lowes.com", "Lowe's"),
        ("reddit.com", "Reddit"),
    ];

    for (known_domain, label) in KNOWN {
        if domain == *known_domain || domain.ends_with(&format!(".{known_domain}")) {
            return label.to_string();
        }
    }

    let second_level = domain.split('.').next().unwrap_or(domain);
    let mut chars = second_level.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => domain.to_string(),
    }
}

fn extract_tags(
    query: &str,
    haystack: &str,
    resource_type: ResourceType,
    content_type: ContentKind,
) -> Vec<String> {
    let mut tags: Vec<String> = significant_terms(query)
        .into_iter()
        .filter(|t| haystack.contains(t.as_str()))
        .collect();

    tags.push(resource_type.as_str().to_string());
    if content_type != ContentKind::Mixed {
        tags.push(content_type.as_str().to_string());
    }

    tags.dedup();
    tags.truncate(MAX_TAGS);
    tags
}

fn extract_youtube_id(url: &str) -> Option<String> {
    let markers = ["watch?v=", "youtu.be/", "/embed/", "/shorts/"];
    for marker in markers {
        if let Some(idx) = url.find(marker) {
            let id: String = url[idx + marker.len()..]
                .chars()
                .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
                .collect();
            if !id.is_empty() {
                return Some(id);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_raw(url: &str, title: &str, text: &str) -> RawCandidate {
        RawCandidate {
            url: url.to_string(),
            title: title.to_string(),
            text: text.to_string(),
            published_date: None,
            score: 0.8,
        }
    }

    fn process(url: &str, title: &str, text: &str) -> DiySearchResult {
        process_candidate(&make_raw(url, title, text), "fix faucet", ResourceType::Tutorial)
            .unwrap()
    }

    #[test]
    fn test_invalid_url_dropped() {
        let raw = make_raw("garbage", "Fix Faucet", "text");
        assert!(process_candidate(&raw, "fix faucet", ResourceType::Tutorial).is_none());
    }

    #[test]
    fn test_youtube_video_classification() {
        let result = process(
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "Fix a Leaky Faucet",
            "In this video we...",
        );
        assert_eq!(result.content_type, ContentKind::Video);
        assert!(result.is_youtube);
        assert_eq!(result.video_id.as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(
            result.thumbnail_url.as_deref(),
            Some("https://img.youtube.com/vi/dQw4w9WgXcQ/hqdefault.jpg")
        );
        assert_eq!(result.source, "YouTube");
    }

    #[test]
    fn test_youtu_be_short_link() {
        let result = process("https://youtu.be/abc_123-Z", "Faucet fix", "");
        assert_eq!(result.video_id.as_deref(), Some("abc_123-Z"));
    }

    #[test]
    fn test_pinterest_is_visual() {
        let result = process(
            "https://www.pinterest.com/pin/12345",
            "Faucet upgrade ideas",
            "",
        );
        assert_eq!(result.content_type, ContentKind::Visual);
        assert!(result.is_pinterest);
        assert!(result.is_gallery);
    }

    #[test]
    fn test_two_indicators_make_visual() {
        let result = process(
            "https://www.bobvila.com/bathrooms",
            "Bathroom makeover gallery",
            "",
        );
        assert_eq!(result.content_type, ContentKind::Visual);
    }

    #[test]
    fn test_single_indicator_makes_mixed() {
        let result = process(
            "https://www.bobvila.com/bathrooms",
            "Bathroom makeover on a budget",
            "",
        );
        assert_eq!(result.content_type, ContentKind::Mixed);
    }

    #[test]
    fn test_plain_page_is_article() {
        let result = process(
            "https://www.familyhandyman.com/faucet",
            "How to Fix a Leaky Faucet",
            "Shut off the water supply first.",
        );
        assert_eq!(result.content_type, ContentKind::Article);
        assert_eq!(result.visual_quality, VisualQuality::Low);
    }

    #[test]
    fn test_image_points_accumulate() {
        let result = process(
            "https://www.familyhandyman.com/faucet",
            "Faucet repair photos",
            "A step by step guide with pictures, including before and after shots.",
        );
        // photos +5, step-by-step with pictures +3, before/after +2.
        assert_eq!(result.image_count, 10);
        assert!(result.has_images);
        assert!(result.has_before_after);
        assert!(result.is_gallery); // >= 5 estimated images
    }

    #[test]
    fn test_image_floor_of_one() {
        let result = process(
            "https://www.familyhandyman.com/faucet",
            "Fix a faucet",
            "See the picture below for the washer orientation.",
        );
        assert_eq!(result.image_count, 1);
        assert!(!result.is_gallery);
    }

    #[test]
    fn test_snippet_ellipsized_at_300() {
        let long_text = "word ".repeat(100);
        let result = process("https://www.wikihow.com/x", "Fix faucet", &long_text);
        assert!(result.snippet.chars().count() <= 300);
        assert!(result.snippet.ends_with("..."));
    }

    #[test]
    fn test_difficulty_keywords() {
        let easy = process("https://www.wikihow.com/x", "Easy faucet fix", "");
        assert_eq!(easy.difficulty, "beginner");

        let pro = process("https://www.wikihow.com/x", "Faucet fix", "advanced plumbing");
        assert_eq!(pro.difficulty, "advanced");

        let neither = process("https://www.wikihow.com/x", "Faucet fix", "");
        assert_eq!(neither.difficulty, "intermediate");
    }

    #[test]
    fn test_source_label_fallback_capitalizes() {
        let result = process("https://diyhomestead.net/faucet", "Fix faucet", "");
        assert_eq!(result.source, "Diyhomestead");
    }

    #[test]
    fn test_tags_capped_and_relevant() {
        let raw = make_raw(
            "https://www.wikihow.com/x",
            "Fix a leaky faucet",
            "faucet washer cartridge",
        );
        let result =
            process_candidate(&raw, "fix leaky faucet washer cartridge", ResourceType::Tutorial)
                .unwrap();
        assert!(result.tags.len() <= 8);
        assert!(result.tags.contains(&"faucet".to_string()));
        assert!(result.tags.contains(&"tutorial".to_string()));
    }

    #[test]
    fn test_provider_score_clamped() {
        let mut raw = make_raw("https://www.wikihow.com/x", "Fix faucet", "");
        raw.score = 3.7;
        let result = process_candidate(&raw, "fix faucet", ResourceType::Tutorial).unwrap();
        assert_eq!(result.score, 1.0);
    }

    #[test]
    fn test_high_visual_quality() {
        let result = process(
            "https://www.houzz.com/bathrooms",
            "Stunning bathroom transformations",
            "",
        );
        assert_eq!(result.visual_quality, VisualQuality::High);
    }
}
