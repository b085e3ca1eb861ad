//! Cheap early rejection of raw candidates.
//!
//! Runs before classification and validation to bound downstream cost. A
//! candidate survives only if its domain is trusted (or looks DIY-related),
//! its title shares vocabulary with the query, it matches an explicitly
//! requested content kind, and it is not detected as non-English or
//! commercial spam.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use tracing::debug;

use crate::metrics;
use crate::orchestrator::{ContentKind, ResourceType};
use crate::provider::RawCandidate;
use crate::query::significant_terms;

use super::domain_of;

/// Domains trusted for every resource type.
const TRUSTED_DOMAINS: &[&str] = &[
    "youtube.com",
    "youtu.be",
    "vimeo.com",
    "instructables.com",
    "wikihow.com",
    "familyhandyman.com",
    "thisoldhouse.com",
    "bobvila.com",
    "hometalk.com",
    "apartmenttherapy.com",
    "thespruce.com",
    "hgtv.com",
    "houzz.com",
    "pinterest.com",
    "instagram.com",
    "reddit.com",
];

/// Additional domains trusted only for materials searches.
const MATERIALS_DOMAINS: &[&str] = &[
    "homedepot.com",
    "lowes.com",
    "acehardware.com",
    "harborfreight.com",
    "menards.com",
    "rockler.com",
    "woodcraft.com",
    "amazon.com",
];

/// Domain-name patterns that mark a site as DIY-related even when it is not
/// on the allowlist.
static DIY_DOMAIN_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"diy",
        r"home.?improvement",
        r"home.?repair",
        r"handyman",
        r"woodwork",
        r"remodel",
        r"renovat",
        r"craft",
        r"maker",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static pattern"))
    .collect()
});

/// Term -> synonyms, consulted when no query term appears in the title.
const TERM_SYNONYMS: &[(&str, &[&str])] = &[
    ("repair", &["fix", "restore", "mend", "rebuild"]),
    ("fix", &["repair", "restore", "mend", "patch"]),
    ("build", &["make", "construct", "assemble", "create"]),
    ("install", &["mount", "fit", "attach", "replace"]),
    ("paint", &["painting", "stain", "refinish"]),
    ("clean", &["cleaning", "remove", "wash"]),
    ("decorate", &["decorating", "styling", "makeover"]),
];

/// Phrases whose accumulation marks a commercial spam page.
const SPAM_PHRASES: &[&str] = &[
    "buy now",
    "limited offer",
    "limited time",
    "discount code",
    "free shipping",
    "best price",
    "lowest price",
    "coupon",
    "% off",
    "order today",
];

const SPAM_PHRASE_THRESHOLD: usize = 3;

/// Non-English detection kicks in only on texts at least this long.
const LANGUAGE_MIN_TEXT_LEN: usize = 50;
const NON_LATIN_RATIO_LIMIT: f32 = 0.05;

/// The trusted domain allowlist for a resource type, for use as a provider
/// domain filter.
pub fn trusted_domains(resource_type: ResourceType) -> Vec<String> {
    let mut domains: Vec<String> = TRUSTED_DOMAINS.iter().map(|d| d.to_string()).collect();
    if resource_type == ResourceType::Materials {
        domains.extend(MATERIALS_DOMAINS.iter().map(|d| d.to_string()));
    }
    domains
}

/// Apply the pre-filter to a batch of raw candidates.
///
/// Never increases the candidate count. Records seen/rejected counts for
/// the filter-efficiency metrics.
pub fn prefilter_candidates(
    candidates: Vec<RawCandidate>,
    query: &str,
    resource_type: ResourceType,
    requested_kind: ContentKind,
) -> Vec<RawCandidate> {
    let seen = candidates.len();
    let query_terms = significant_terms(query);

    let kept: Vec<RawCandidate> = candidates
        .into_iter()
        .filter(|c| passes(c, &query_terms, resource_type, requested_kind))
        .collect();

    metrics::PREFILTER_CANDIDATES.inc_by(seen as u64);
    metrics::PREFILTER_REJECTED.inc_by((seen - kept.len()) as u64);
    debug!(seen = seen, kept = kept.len(), "Pre-filter pass");

    kept
}

fn passes(
    candidate: &RawCandidate,
    query_terms: &[String],
    resource_type: ResourceType,
    requested_kind: ContentKind,
) -> bool {
    let Some(domain) = domain_of(&candidate.url) else {
        return false;
    };

    if !domain_is_acceptable(&domain, resource_type) {
        return false;
    }

    if !title_matches_query(&candidate.title, query_terms) {
        return false;
    }

    if requested_kind != ContentKind::Mixed
        && !signals_content_kind(requested_kind, &candidate.url, &candidate.title, &candidate.text)
    {
        return false;
    }

    if is_likely_non_english(&candidate.text) {
        return false;
    }

    // Materials searches hit merchant pages by design, so the spam
    // heuristic would reject exactly what the caller asked for.
    if resource_type != ResourceType::Materials && looks_like_spam(candidate) {
        return false;
    }

    true
}

fn domain_is_acceptable(domain: &str, resource_type: ResourceType) -> bool {
    let trusted = TRUSTED_DOMAINS
        .iter()
        .any(|d| domain == *d || domain.ends_with(&format!(".{d}")));
    if trusted {
        return true;
    }

    if resource_type == ResourceType::Materials {
        let merchant = MATERIALS_DOMAINS
            .iter()
            .any(|d| domain == *d || domain.ends_with(&format!(".{d}")));
        if merchant {
            return true;
        }
    }

    DIY_DOMAIN_PATTERNS.iter().any(|p| p.is_match(domain))
}

fn title_matches_query(title: &str, query_terms: &[String]) -> bool {
    if query_terms.is_empty() {
        return true;
    }

    let title_lower = title.to_lowercase();
    if query_terms.iter().any(|t| title_lower.contains(t.as_str())) {
        return true;
    }

    // Semantic fallback: a synonym of a query term counts as a match.
    query_terms.iter().any(|term| {
        TERM_SYNONYMS
            .iter()
            .filter(|(key, _)| key == term)
            .any(|(_, synonyms)| synonyms.iter().any(|s| title_lower.contains(s)))
    })
}

fn signals_content_kind(kind: ContentKind, url: &str, title: &str, text: &str) -> bool {
    let url_lower = url.to_lowercase();
    let title_lower = title.to_lowercase();

    match kind {
        ContentKind::Video => {
            url_lower.contains("youtube.com")
                || url_lower.contains("youtu.be")
                || url_lower.contains("vimeo.com")
                || title_lower.contains("video")
                || title_lower.contains("tutorial")
        }
        ContentKind::Visual => {
            url_lower.contains("pinterest")
                || url_lower.contains("instagram")
                || title_lower.contains("photo")
                || title_lower.contains("gallery")
                || title_lower.contains("before and after")
        }
        ContentKind::Article => {
            let is_video = url_lower.contains("youtube.com") || url_lower.contains("vimeo.com");
            let is_pin = url_lower.contains("pinterest");
            let guide_like = title_lower.contains("guide")
                || title_lower.contains("how to")
                || title_lower.contains("steps");
            !is_video && !is_pin && (text.len() > 200 || guide_like)
        }
        ContentKind::Mixed => true,
    }
}

/// Heuristic language check: the share of characters from non-Latin or
/// accented classes, over texts of at least 50 chars.
pub(crate) fn is_likely_non_english(text: &str) -> bool {
    let total = text.chars().count();
    if total < LANGUAGE_MIN_TEXT_LEN {
        return false;
    }

    let foreign = text.chars().filter(|c| is_foreign_char(*c)).count();
    (foreign as f32 / total as f32) > NON_LATIN_RATIO_LIMIT
}

fn is_foreign_char(c: char) -> bool {
    matches!(c,
        '\u{00C0}'..='\u{024F}'   // accented Latin
        | '\u{0370}'..='\u{03FF}' // Greek
        | '\u{0400}'..='\u{04FF}' // Cyrillic
        | '\u{0590}'..='\u{05FF}' // Hebrew
        | '\u{0600}'..='\u{06FF}' // Arabic
        | '\u{3040}'..='\u{30FF}' // Japanese kana
        | '\u{4E00}'..='\u{9FFF}' // CJK
        | '\u{AC00}'..='\u{D7AF}' // Hangul
    )
}

fn looks_like_spam(candidate: &RawCandidate) -> bool {
    let haystack = format!(
        "{} {}",
        candidate.title.to_lowercase(),
        candidate.text.to_lowercase()
    );
    let hits = SPAM_PHRASES
        .iter()
        .filter(|p| haystack.contains(*p))
        .count();
    hits >= SPAM_PHRASE_THRESHOLD
}
