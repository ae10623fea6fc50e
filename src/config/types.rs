use serde::Deserialize;

/// Main configuration structure for Orbweaver
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub site: SiteConfig,
}

/// Pipeline behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of concurrent downloads
    #[serde(rename = "download-max")]
    pub download_max: u32,

    /// Maximum number of concurrent extract workers
    #[serde(rename = "extract-max")]
    pub extract_max: u32,

    /// Restrict discovered links to those containing the base URL
    #[serde(rename = "same-site-only", default = "default_same_site")]
    pub same_site_only: bool,
}

fn default_same_site() -> bool {
    true
}

/// Per-site request configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Base URL substring used to keep discovered links on-site
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// User agent sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Optional proxy address (e.g. "http://127.0.0.1:8080")
    #[serde(default)]
    pub proxy: Option<String>,

    /// Optional Cookie header value
    #[serde(default)]
    pub cookie: Option<String>,

    /// Optional per-request timeout in milliseconds
    #[serde(rename = "timeout-ms", default)]
    pub timeout_ms: Option<u64>,

    /// Seed URLs that start the crawl
    #[serde(default)]
    pub seeds: Vec<String>,
}

impl Config {
    /// True if a discovered link passes the same-site policy.
    ///
    /// The check is a plain substring match against the configured base URL,
    /// so a bare host ("example.com") keeps everything on that host while a
    /// path prefix narrows further. Always true when `same-site-only` is off.
    pub fn matches_site(&self, url: &url::Url) -> bool {
        if !self.crawler.same_site_only {
            return true;
        }
        url.as_str().contains(&self.site.base_url)
    }
}
