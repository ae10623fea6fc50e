//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the shared HTTP client from the site configuration
//! - Downloading one task's body, appending response chunks incrementally
//! - Converting transport errors and non-2xx statuses into completed
//!   (possibly empty) results rather than failures
//!
//! A failed fetch is never retried; it is logged and flows downstream like
//! any other completion so the pipeline keeps moving.

use crate::config::SiteConfig;
use crate::crawler::scheduler::FetchTask;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use reqwest::{Client, Proxy};
use std::time::Duration;

/// Builds the HTTP client shared by all download workers.
///
/// Applies the configured user agent, optional proxy, optional Cookie
/// header, and optional per-request timeout. Redirects are followed
/// (reqwest's default policy). No timeout is applied unless configured.
pub fn build_http_client(site: &SiteConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(site.user_agent.clone())
        .gzip(true)
        .brotli(true);

    if let Some(timeout_ms) = site.timeout_ms {
        builder = builder.timeout(Duration::from_millis(timeout_ms));
    }

    if let Some(proxy) = &site.proxy {
        builder = builder.proxy(Proxy::all(proxy.clone())?);
    }

    if let Some(cookie) = &site.cookie {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(cookie) {
            headers.insert(COOKIE, value);
            builder = builder.default_headers(headers);
        } else {
            tracing::warn!("configured cookie contains invalid header characters, ignoring");
        }
    }

    builder.build()
}

/// Downloads one task's body into its buffer.
///
/// The response arrives in chunks; each is appended to the task's buffer
/// as it comes in. A non-2xx status is logged but the body is still read,
/// and a transport error mid-stream keeps whatever bytes arrived before
/// it. Either way the task comes back completed so the extract stage can
/// consume it.
pub async fn fetch_task(client: &Client, mut task: FetchTask) -> FetchTask {
    let mut response = match client.get(task.url.clone()).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("fetch failed for {}: {}", task.url, e);
            return task;
        }
    };

    let status = response.status();
    if !status.is_success() {
        tracing::warn!("HTTP {} for {}", status.as_u16(), task.url);
    }

    loop {
        match response.chunk().await {
            Ok(Some(chunk)) => task.body.extend_from_slice(&chunk),
            Ok(None) => break,
            Err(e) => {
                tracing::warn!("body read failed for {}: {}", task.url, e);
                break;
            }
        }
    }

    task
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::queue::TaskId;
    use url::Url;

    fn site_config() -> SiteConfig {
        SiteConfig {
            base_url: "example.test".to_string(),
            user_agent: "TestBot/1.0".to_string(),
            proxy: None,
            cookie: None,
            timeout_ms: None,
            seeds: vec![],
        }
    }

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&site_config());
        assert!(client.is_ok());
    }

    #[test]
    fn test_build_http_client_with_options() {
        let mut config = site_config();
        config.proxy = Some("http://127.0.0.1:8080".to_string());
        config.cookie = Some("session=abc".to_string());
        config.timeout_ms = Some(5000);

        let client = build_http_client(&config);
        assert!(client.is_ok());
    }

    #[test]
    fn test_build_http_client_ignores_bad_cookie() {
        let mut config = site_config();
        config.cookie = Some("bad\ncookie".to_string());

        // Invalid header bytes are dropped rather than failing the build.
        let client = build_http_client(&config);
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host_returns_empty_task() {
        let client = build_http_client(&site_config()).unwrap();
        let task = FetchTask {
            id: TaskId(0),
            // Reserved TLD, resolution fails fast.
            url: Url::parse("http://unreachable.invalid/").unwrap(),
            body: Vec::new(),
        };

        let task = fetch_task(&client, task).await;
        assert!(task.body.is_empty());
    }
}
