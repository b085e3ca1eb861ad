//! Upstream neural-search capability.
//!
//! This module provides a `SearchProvider` trait so the upstream SDK can be
//! swapped without touching orchestration logic. The provider is treated as
//! an opaque, possibly failing, possibly slow capability: given a query
//! string and a small config object, return a list of candidate documents.

mod neural;
mod types;

pub use neural::NeuralClient;
pub use types::*;
