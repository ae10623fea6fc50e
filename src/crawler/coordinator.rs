//! Crawl coordinator - owns the pipeline and its public surface
//!
//! The coordinator holds the configuration, the HTTP client, the page
//! sink, and the single lock guarding all shared pipeline state. It
//! exposes the operations callers use: seeding, running the crawl to
//! completion, and handing out a [`CrawlHandle`] for seeding or stopping
//! from other tasks (including from inside a page sink).

use crate::config::{validate, Config};
use crate::crawler::fetcher::build_http_client;
use crate::crawler::scheduler::{PipelineSnapshot, PipelineState, Scheduler};
use crate::seen::SeenSet;
use crate::sink::PageSink;
use crate::{Result, SpiderError};
use reqwest::Client;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use url::Url;

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    state: Arc<Mutex<PipelineState>>,
    wake: Arc<Notify>,
    client: Client,
    sink: Option<Arc<dyn PageSink>>,
}

impl Coordinator {
    /// Creates a coordinator from a validated configuration.
    ///
    /// The configuration is validated again here so programmatically built
    /// configs get the same checks as TOML-loaded ones; a zero concurrency
    /// ceiling would park the pipeline forever.
    pub fn new(config: Config) -> Result<Self> {
        validate(&config).map_err(SpiderError::Config)?;

        let client = build_http_client(&config.site)?;
        let state = PipelineState::new(SeenSet::with_defaults());

        Ok(Self {
            config: Arc::new(config),
            state: Arc::new(Mutex::new(state)),
            wake: Arc::new(Notify::new()),
            client,
            sink: None,
        })
    }

    /// Sets the page sink. Must be called before [`run`](Self::run).
    pub fn set_sink(&mut self, sink: Arc<dyn PageSink>) {
        self.sink = Some(sink);
    }

    /// Seeds the crawl with a URL.
    ///
    /// Returns `Ok(true)` if a download task was enqueued, `Ok(false)` if
    /// the URL was already seen (seeding is idempotent). Rejects non-http(s)
    /// URLs.
    pub fn seed(&self, url: &str) -> Result<bool> {
        accept_seed(&self.state, &self.wake, url)
    }

    /// Returns a cloneable handle for seeding, stopping, and inspecting
    /// the crawl while it runs.
    pub fn handle(&self) -> CrawlHandle {
        CrawlHandle {
            state: self.state.clone(),
            wake: self.wake.clone(),
        }
    }

    /// Runs the crawl until no work remains (or a stop drains it).
    ///
    /// Fails immediately with a configuration error if no page sink was
    /// set. The future resolves once both stages are empty of pending and
    /// in-flight work.
    pub async fn run(&self) -> Result<()> {
        let sink = self
            .sink
            .clone()
            .ok_or(SpiderError::Config(crate::ConfigError::MissingSink))?;

        tracing::info!(
            "starting crawl: download_max={}, extract_max={}, same_site_only={}",
            self.config.crawler.download_max,
            self.config.crawler.extract_max,
            self.config.crawler.same_site_only
        );

        let scheduler = Scheduler::new(
            self.state.clone(),
            self.wake.clone(),
            self.client.clone(),
            self.config.clone(),
            sink,
        );
        scheduler.run().await
    }
}

/// Handle onto a running (or not-yet-running) crawl.
///
/// Seeding through the handle goes through the same accept path as
/// everything else: dedup check, dedup add, enqueue, wake. That makes it
/// the supported way for a page sink to feed URLs back into the crawl.
#[derive(Clone)]
pub struct CrawlHandle {
    state: Arc<Mutex<PipelineState>>,
    wake: Arc<Notify>,
}

impl CrawlHandle {
    /// Seeds a URL; same contract as [`Coordinator::seed`].
    pub fn seed_url(&self, url: &str) -> Result<bool> {
        accept_seed(&self.state, &self.wake, url)
    }

    /// Stops the crawl: pending work is dropped and nothing further is
    /// dispatched. Work already on a worker completes but its results are
    /// discarded. `run` returns once in-flight work drains.
    pub fn stop(&self) {
        let mut state = self.state.lock().unwrap();
        state.stop();
        drop(state);
        self.wake.notify_one();
    }

    /// Point-in-time view of queue depths and progress.
    pub fn snapshot(&self) -> PipelineSnapshot {
        let state = self.state.lock().unwrap();
        PipelineSnapshot::of(&state)
    }
}

/// Shared seed path: validate scheme, then dedup-check/add and enqueue
/// under the lock, waking the scheduler if a task was created.
fn accept_seed(
    state: &Arc<Mutex<PipelineState>>,
    wake: &Arc<Notify>,
    url: &str,
) -> Result<bool> {
    let parsed = Url::parse(url)?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(SpiderError::InvalidSeed {
            url: url.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }

    let accepted = {
        let mut state = state.lock().unwrap();
        state.accept_url(&parsed)
    };

    if accepted {
        tracing::debug!("seeded {}", parsed);
        wake.notify_one();
    }
    Ok(accepted)
}
