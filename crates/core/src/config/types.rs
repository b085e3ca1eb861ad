use serde::{Deserialize, Serialize};

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub provider: ProviderConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub dedup: DedupConfig,
}

/// Upstream search provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// API credential, read once at startup.
    pub api_key: String,
    /// Provider endpoint base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds (default: 20).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_base_url() -> String {
    "https://api.neuralsearch.io/v1".to_string()
}

fn default_timeout() -> u32 {
    20
}

/// Result cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Entry time-to-live in seconds (default: 30 minutes).
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
    /// Maximum number of entries before the expired-entry sweep kicks in.
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,
    /// Query-frequency record time-to-live in seconds (default: 1 hour).
    #[serde(default = "default_frequency_ttl")]
    pub query_frequency_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl(),
            capacity: default_cache_capacity(),
            query_frequency_ttl_secs: default_frequency_ttl(),
        }
    }
}

fn default_cache_ttl() -> u64 {
    30 * 60
}

fn default_cache_capacity() -> usize {
    1000
}

fn default_frequency_ttl() -> u64 {
    60 * 60
}

/// Request deduplicator configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DedupConfig {
    /// How long a completed entry is kept for burst reuse (default: 5 minutes).
    #[serde(default = "default_dedup_retention")]
    pub retention_secs: u64,
    /// Safety threshold: the registry is cleared wholesale past this size.
    #[serde(default = "default_dedup_max_entries")]
    pub max_entries: usize,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            retention_secs: default_dedup_retention(),
            max_entries: default_dedup_max_entries(),
        }
    }
}

fn default_dedup_retention() -> u64 {
    5 * 60
}

fn default_dedup_max_entries() -> usize {
    256
}

/// Sanitized config for diagnostics (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub provider: SanitizedProviderConfig,
    pub cache: CacheConfig,
    pub dedup: DedupConfig,
}

/// Sanitized provider config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedProviderConfig {
    pub base_url: String,
    pub api_key_configured: bool,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            provider: SanitizedProviderConfig {
                base_url: config.provider.base_url.clone(),
                api_key_configured: !config.provider.api_key.is_empty(),
                timeout_secs: config.provider.timeout_secs,
            },
            cache: config.cache.clone(),
            dedup: config.dedup.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_config() {
        let toml = r#"
[provider]
api_key = "test-key"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.provider.api_key, "test-key");
        assert_eq!(config.provider.timeout_secs, 20);
        assert_eq!(config.cache.ttl_secs, 30 * 60);
        assert_eq!(config.cache.capacity, 1000);
        assert_eq!(config.dedup.retention_secs, 5 * 60);
    }

    #[test]
    fn test_deserialize_missing_provider_fails() {
        let toml = r#"
[cache]
ttl_secs = 60
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_with_overrides() {
        let toml = r#"
[provider]
api_key = "k"
base_url = "https://search.internal"
timeout_secs = 5

[cache]
ttl_secs = 120
capacity = 10

[dedup]
retention_secs = 30
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.provider.base_url, "https://search.internal");
        assert_eq!(config.provider.timeout_secs, 5);
        assert_eq!(config.cache.ttl_secs, 120);
        assert_eq!(config.cache.capacity, 10);
        assert_eq!(config.dedup.retention_secs, 30);
        assert_eq!(config.dedup.max_entries, 256); // default
    }

    #[test]
    fn test_sanitized_config_hides_api_key() {
        let config = Config {
            provider: ProviderConfig {
                api_key: "secret".to_string(),
                base_url: default_base_url(),
                timeout_secs: 20,
            },
            cache: CacheConfig::default(),
            dedup: DedupConfig::default(),
        };

        let sanitized = SanitizedConfig::from(&config);
        assert!(sanitized.provider.api_key_configured);

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("secret"));
    }
}
