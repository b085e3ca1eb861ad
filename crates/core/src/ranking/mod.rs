//! Result processing: pre-filtering, classification, relevance validation,
//! and balancing.
//!
//! # Pipeline position
//!
//! ```text
//! raw candidates -> prefilter -> classify (process) -> relevance -> balance
//! ```
//!
//! The pre-filter is the cheap early rejection pass; everything downstream
//! of it is pure, deterministic text analysis with no network calls.

mod balance;
mod classify;
mod prefilter;
mod relevance;

pub use balance::{balance_results, similarity_score};
pub use classify::process_candidate;
pub use prefilter::{prefilter_candidates, trusted_domains};
pub use relevance::{apply_validation, validate_result, RelevanceWeights, Validation};

/// Extract the host part of a URL, lowercased, without a leading `www.`.
pub(crate) fn domain_of(url: &str) -> Option<String> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))?;
    let host = rest.split(['/', '?', '#']).next()?;
    let host = host.split('@').next_back()?.split(':').next()?;
    if host.is_empty() || !host.contains('.') {
        return None;
    }
    Some(host.trim_start_matches("www.").to_lowercase())
}
