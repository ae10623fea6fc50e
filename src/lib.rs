//! Orbweaver: a concurrent web crawl pipeline
//!
//! This crate implements a web crawler built around a two-stage pipeline
//! (download, extract) with bounded per-stage concurrency, a shared-lock
//! state machine for pending/in-flight work, and a probabilistic seen-set
//! that gates which URLs ever enter the pipeline.

pub mod config;
pub mod crawler;
pub mod seen;
pub mod sink;

use thiserror::Error;

/// Main error type for Orbweaver operations
#[derive(Debug, Error)]
pub enum SpiderError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid seed URL {url}: {reason}")]
    InvalidSeed { url: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("No page sink configured (call set_sink before run)")]
    MissingSink,
}

/// Result type alias for Orbweaver operations
pub type Result<T> = std::result::Result<T, SpiderError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, CrawlHandle, PipelineSnapshot};
pub use seen::SeenSet;
pub use sink::{LogSink, PageSink};
