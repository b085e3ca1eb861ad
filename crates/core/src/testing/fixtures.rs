//! Candidate and options fixtures for tests.

use crate::orchestrator::{ResourceType, SearchOptions};
use crate::provider::RawCandidate;

/// An article candidate on a trusted DIY domain whose title/text echo the
/// slug, so it passes the pre-filter for queries built from the same words.
pub fn article_candidate(slug: &str, title: &str) -> RawCandidate {
    RawCandidate {
        url: format!("https://www.familyhandyman.com/{slug}"),
        title: title.to_string(),
        text: format!("{title}. A practical walk-through with the tools you need."),
        published_date: None,
        score: 0.7,
    }
}

/// A YouTube video candidate.
pub fn video_candidate(video_id: &str, title: &str) -> RawCandidate {
    RawCandidate {
        url: format!("https://www.youtube.com/watch?v={video_id}"),
        title: title.to_string(),
        text: format!("{title}. Watch the full walk-through."),
        published_date: None,
        score: 0.8,
    }
}

/// A Pinterest pin candidate (classifies as visual).
pub fn visual_candidate(pin_id: &str, title: &str) -> RawCandidate {
    RawCandidate {
        url: format!("https://www.pinterest.com/pin/{pin_id}"),
        title: title.to_string(),
        text: format!("{title}. Gallery of photos with before and after shots."),
        published_date: None,
        score: 0.6,
    }
}

/// Default tutorial options for a query.
pub fn tutorial_options(query: &str) -> SearchOptions {
    SearchOptions::new(query, ResourceType::Tutorial)
}
