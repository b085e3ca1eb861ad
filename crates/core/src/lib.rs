//! DIY how-to resource search aggregation and ranking engine.
//!
//! Turns a free-text query plus optional project context into a ranked,
//! deduplicated set of how-to resource links, backed by an upstream neural
//! search provider. The provider, the result cache, the request
//! deduplicator and the optional history store are injected explicitly;
//! nothing here is an ambient global.

pub mod cache;
pub mod config;
pub mod dedup;
pub mod history;
pub mod metrics;
pub mod orchestrator;
pub mod provider;
pub mod query;
pub mod ranking;
pub mod testing;

pub use cache::ResultCache;
pub use config::{
    load_config, load_config_from_str, validate_config, CacheConfig, Config, ConfigError,
    DedupConfig, ProviderConfig, SanitizedConfig,
};
pub use dedup::{DedupKey, RequestDeduplicator};
pub use history::{HistoryStore, SearchRecord};
pub use orchestrator::{
    ContentKind, DiySearchResult, OrchestratorConfig, ProgressiveCancel, ProgressiveSearch,
    ProgressiveSearchResult, ProjectContext, ResourceType, SearchError, SearchOptions,
    SearchOrchestrator, SearchResponse, VisualQuality,
};
pub use provider::{
    NeuralClient, ProviderError, ProviderQuery, RawCandidate, SearchMode, SearchProvider,
};
