//! Crawler module for web page fetching and processing
//!
//! This module contains the core pipeline:
//! - Stage queues holding pending and in-flight work
//! - The scheduler control loop with bounded per-stage dispatch
//! - HTTP fetching and HTML link extraction workers
//! - The coordinator that owns shared state and the public surface

mod coordinator;
mod fetcher;
mod parser;
mod queue;
mod scheduler;

pub use coordinator::{Coordinator, CrawlHandle};
pub use fetcher::{build_http_client, fetch_task};
pub use parser::extract_links;
pub use queue::{StageQueue, TaskId};
pub use scheduler::{ExtractItem, FetchTask, PipelineSnapshot, PipelineState, Scheduler};

use crate::config::Config;
use crate::sink::PageSink;
use crate::Result;
use std::sync::Arc;

/// Runs a complete crawl: seeds from the configuration, then drives the
/// pipeline until no work remains.
///
/// # Arguments
///
/// * `config` - The crawler configuration (its `site.seeds` start the crawl)
/// * `sink` - Receives every fetched page exactly once
///
/// # Returns
///
/// * `Ok(())` - Crawl completed successfully
/// * `Err(SpiderError)` - Invalid configuration or seed
pub async fn crawl(config: Config, sink: Arc<dyn PageSink>) -> Result<()> {
    let seeds = config.site.seeds.clone();

    let mut coordinator = Coordinator::new(config)?;
    coordinator.set_sink(sink);

    for seed in &seeds {
        coordinator.seed(seed)?;
    }

    coordinator.run().await
}
