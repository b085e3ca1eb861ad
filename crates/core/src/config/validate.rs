use super::{types::Config, ConfigError};

/// Validate a loaded configuration.
///
/// Catches misconfigurations that would otherwise surface as confusing
/// runtime failures (empty credential, zero TTLs, bad base URL).
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.provider.api_key.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "provider.api_key must not be empty".to_string(),
        ));
    }

    if !config.provider.base_url.starts_with("http://")
        && !config.provider.base_url.starts_with("https://")
    {
        return Err(ConfigError::ValidationError(format!(
            "provider.base_url must be an http(s) URL, got: {}",
            config.provider.base_url
        )));
    }

    if config.provider.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "provider.timeout_secs must be greater than 0".to_string(),
        ));
    }

    if config.cache.ttl_secs == 0 {
        return Err(ConfigError::ValidationError(
            "cache.ttl_secs must be greater than 0".to_string(),
        ));
    }

    if config.cache.capacity == 0 {
        return Err(ConfigError::ValidationError(
            "cache.capacity must be greater than 0".to_string(),
        ));
    }

    if config.dedup.max_entries == 0 {
        return Err(ConfigError::ValidationError(
            "dedup.max_entries must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CacheConfig, DedupConfig, ProviderConfig};

    fn valid_config() -> Config {
        Config {
            provider: ProviderConfig {
                api_key: "key".to_string(),
                base_url: "https://api.neuralsearch.io/v1".to_string(),
                timeout_secs: 20,
            },
            cache: CacheConfig::default(),
            dedup: DedupConfig::default(),
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let mut config = valid_config();
        config.provider.api_key = "   ".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_bad_base_url_rejected() {
        let mut config = valid_config();
        config.provider.base_url = "ftp://search".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_zero_cache_capacity_rejected() {
        let mut config = valid_config();
        config.cache.capacity = 0;
        assert!(validate_config(&config).is_err());
    }
}
