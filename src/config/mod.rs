//! Configuration module for Orbweaver
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use orbweaver::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Crawling with {} download workers", config.crawler.download_max);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, SiteConfig};

// Re-export parser functions
pub use parser::load_config;

// Re-export validation for programmatically built configs
pub use validation::validate;
