use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use orbweaver::config::load_config;
///
/// let config = load_config(Path::new("config.toml")).unwrap();
/// println!("Max concurrent downloads: {}", config.crawler.download_max);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    // Read the configuration file
    let content = std::fs::read_to_string(path)?;

    // Parse TOML
    let config: Config = toml::from_str(&content)?;

    // Validate the configuration
    validate(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[crawler]
download-max = 8
extract-max = 8

[site]
base-url = "example.com"
user-agent = "TestBot/1.0"
seeds = ["https://example.com/"]
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.download_max, 8);
        assert_eq!(config.crawler.extract_max, 8);
        // same-site-only defaults to true when omitted
        assert!(config.crawler.same_site_only);
        assert_eq!(config.site.base_url, "example.com");
        assert_eq!(config.site.seeds.len(), 1);
        assert_eq!(config.site.timeout_ms, None);
    }

    #[test]
    fn test_load_config_with_site_options() {
        let config_content = r#"
[crawler]
download-max = 4
extract-max = 2
same-site-only = false

[site]
base-url = "example.com"
user-agent = "TestBot/1.0"
proxy = "http://127.0.0.1:8080"
cookie = "session=abc"
timeout-ms = 5000
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert!(!config.crawler.same_site_only);
        assert_eq!(config.site.proxy.as_deref(), Some("http://127.0.0.1:8080"));
        assert_eq!(config.site.cookie.as_deref(), Some("session=abc"));
        assert_eq!(config.site.timeout_ms, Some(5000));
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let config_content = "this is not valid TOML {{{";
        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[crawler]
download-max = 0
extract-max = 8

[site]
base-url = "example.com"
user-agent = "TestBot/1.0"
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }
}
