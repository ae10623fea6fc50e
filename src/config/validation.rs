use crate::config::types::{Config, CrawlerConfig, SiteConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_site_config(&config.site)?;
    Ok(())
}

/// Validates pipeline configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.download_max < 1 || config.download_max > 256 {
        return Err(ConfigError::Validation(format!(
            "download_max must be between 1 and 256, got {}",
            config.download_max
        )));
    }

    if config.extract_max < 1 || config.extract_max > 256 {
        return Err(ConfigError::Validation(format!(
            "extract_max must be between 1 and 256, got {}",
            config.extract_max
        )));
    }

    Ok(())
}

/// Validates site configuration
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    if config.base_url.is_empty() {
        return Err(ConfigError::Validation(
            "base_url cannot be empty".to_string(),
        ));
    }

    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if let Some(timeout_ms) = config.timeout_ms {
        if timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "timeout_ms must be greater than zero when set".to_string(),
            ));
        }
    }

    if let Some(proxy) = &config.proxy {
        Url::parse(proxy)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid proxy '{}': {}", proxy, e)))?;
    }

    for seed in &config.seeds {
        let url = Url::parse(seed)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Validation(format!(
                "Seed URL '{}' must use http or https scheme",
                seed
            )));
        }
    }

    Ok(())
}
