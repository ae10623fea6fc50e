//! Scheduler for the two-stage crawl pipeline
//!
//! This module owns the shared pipeline state machine and the control loop
//! that drives it:
//! - Dispatching pending work to download and extract workers, bounded by
//!   the per-stage concurrency ceilings
//! - Processing worker completions under the shared lock
//! - Parking when nothing is dispatchable and waking on new work
//!
//! The control loop is the only place a pending item becomes in-flight, and
//! completion handling is the only place an in-flight item is removed. Both
//! run on the control task; workers never touch the queues themselves, they
//! only report results over a channel.

use crate::config::Config;
use crate::crawler::parser::extract_links;
use crate::crawler::queue::{StageQueue, TaskId};
use crate::seen::SeenSet;
use crate::sink::PageSink;
use crate::Result;
use reqwest::Client;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::sync::Notify;
use url::Url;

/// One URL awaiting or undergoing download. The body buffer starts empty
/// and is filled incrementally by the download worker.
#[derive(Debug)]
pub struct FetchTask {
    pub id: TaskId,
    pub url: Url,
    pub body: Vec<u8>,
}

/// A downloaded page awaiting or undergoing link extraction. Structurally
/// the fetch result; ownership moves here from the download stage.
#[derive(Debug)]
pub struct ExtractItem {
    pub id: TaskId,
    pub url: Url,
    pub body: Vec<u8>,
}

/// Everything the dispatch and completion critical sections touch. Lives
/// behind a single mutex; no method here performs I/O.
pub struct PipelineState {
    pub download: StageQueue<FetchTask>,
    pub extract: StageQueue<ExtractItem>,
    pub seen: SeenSet,
    pub stopped: bool,
    pages_done: u64,
    next_id: u64,
}

impl PipelineState {
    pub fn new(seen: SeenSet) -> Self {
        Self {
            download: StageQueue::new(),
            extract: StageQueue::new(),
            seen,
            stopped: false,
            pages_done: 0,
            next_id: 0,
        }
    }

    /// The single entry point into the pipeline: if the URL has not been
    /// seen, records it and enqueues a download task for it. Returns true
    /// if a task was created. Check and add happen under one lock hold, so
    /// two workers discovering the same URL race to exactly one task.
    pub fn accept_url(&mut self, url: &Url) -> bool {
        if self.stopped {
            return false;
        }
        if self.seen.check(url.as_str()) {
            return false;
        }
        self.seen.add(url.as_str());

        let id = self.alloc_id();
        self.download.enqueue_pending(FetchTask {
            id,
            url: url.clone(),
            body: Vec::new(),
        });
        true
    }

    /// True when no work remains anywhere: nothing pending and nothing in
    /// flight in either stage. The control loop exits on this.
    pub fn is_exhausted(&self) -> bool {
        self.download.pending_is_empty()
            && self.download.in_flight_is_empty()
            && self.extract.pending_is_empty()
            && self.extract.in_flight_is_empty()
    }

    /// Stops the crawl: no further dispatch, pending work dropped.
    /// In-flight work drains but its results are discarded.
    pub fn stop(&mut self) {
        self.stopped = true;
        self.download.clear_pending();
        self.extract.clear_pending();
    }

    pub fn pages_done(&self) -> u64 {
        self.pages_done
    }

    fn alloc_id(&mut self) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        id
    }
}

/// Point-in-time view of the pipeline, for progress reporting and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSnapshot {
    pub download_pending: usize,
    pub download_in_flight: usize,
    pub extract_pending: usize,
    pub extract_in_flight: usize,
    pub pages_done: u64,
    pub stopped: bool,
}

impl PipelineSnapshot {
    pub fn of(state: &PipelineState) -> Self {
        Self {
            download_pending: state.download.pending_len(),
            download_in_flight: state.download.in_flight_len(),
            extract_pending: state.extract.pending_len(),
            extract_in_flight: state.extract.in_flight_len(),
            pages_done: state.pages_done(),
            stopped: state.stopped,
        }
    }
}

/// A worker's report back to the control loop.
enum Completion {
    /// Download finished (successfully or not); the task carries whatever
    /// body bytes arrived.
    Download(FetchTask),

    /// Extraction finished; `links` are the absolute http(s) URLs found on
    /// the page, not yet deduplicated.
    Extract { id: TaskId, links: Vec<Url> },
}

/// Drives the pipeline until no work remains.
pub struct Scheduler {
    state: Arc<Mutex<PipelineState>>,
    wake: Arc<Notify>,
    client: Client,
    config: Arc<Config>,
    sink: Arc<dyn PageSink>,
}

impl Scheduler {
    pub fn new(
        state: Arc<Mutex<PipelineState>>,
        wake: Arc<Notify>,
        client: Client,
        config: Arc<Config>,
        sink: Arc<dyn PageSink>,
    ) -> Self {
        Self {
            state,
            wake,
            client,
            config,
            sink,
        }
    }

    /// The control loop. Each iteration dispatches whatever the stage
    /// ceilings allow, then either exits (all four queues empty) or parks
    /// until a worker completes or an external enqueue signals the wake
    /// notifier. Parking instead of polling is what makes "enqueue while
    /// dormant" safe: every enqueue path notifies, and `Notify` stores a
    /// permit if no one is waiting yet.
    pub async fn run(&self) -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel();

        loop {
            self.dispatch(&tx);

            {
                let state = self.state.lock().unwrap();
                if state.is_exhausted() {
                    tracing::info!(
                        "pipeline drained, {} pages processed",
                        state.pages_done()
                    );
                    break;
                }
            }

            tokio::select! {
                completion = rx.recv() => {
                    // The loop holds `tx`, so the channel cannot close here.
                    if let Some(completion) = completion {
                        self.complete(completion);
                    }
                }
                _ = self.wake.notified() => {}
            }
        }

        Ok(())
    }

    /// Dispatch critical section: moves pending items in-flight and hands
    /// them to workers, as many as each stage's ceiling allows. Strictly
    /// `in_flight < max`, so the ceiling is an inclusive bound on
    /// simultaneous work.
    fn dispatch(&self, tx: &UnboundedSender<Completion>) {
        let mut state = self.state.lock().unwrap();
        if state.stopped {
            return;
        }

        let download_max = self.config.crawler.download_max as usize;
        while state.download.in_flight_len() < download_max {
            let Some(task) = state.download.take_pending() else {
                break;
            };
            state.download.mark_in_flight(task.id);
            self.spawn_download(task, tx.clone());
        }

        let extract_max = self.config.crawler.extract_max as usize;
        while state.extract.in_flight_len() < extract_max {
            let Some(item) = state.extract.take_pending() else {
                break;
            };
            state.extract.mark_in_flight(item.id);
            self.spawn_extract(item, tx.clone());
        }
    }

    /// Download worker: all I/O happens here, outside the lock.
    fn spawn_download(&self, task: FetchTask, tx: UnboundedSender<Completion>) {
        let client = self.client.clone();
        tokio::spawn(async move {
            let task = super::fetcher::fetch_task(&client, task).await;
            // Receiver gone means the crawl already ended; nothing to do.
            let _ = tx.send(Completion::Download(task));
        });
    }

    /// Extract worker: parses outside the lock and invokes the page sink
    /// exactly once, then reports the resolved links.
    fn spawn_extract(&self, item: ExtractItem, tx: UnboundedSender<Completion>) {
        let sink = self.sink.clone();
        tokio::spawn(async move {
            let links = extract_links(&item.body, &item.url);
            sink.page(&item.body, &item.url);
            let _ = tx.send(Completion::Extract {
                id: item.id,
                links,
            });
        });
    }

    /// Completion critical section: removes the item from its in-flight
    /// set and feeds its output downstream. After a stop the removal still
    /// happens (so the pipeline drains) but the output is discarded.
    fn complete(&self, completion: Completion) {
        match completion {
            Completion::Download(task) => {
                let mut state = self.state.lock().unwrap();
                if !state.download.remove_in_flight(task.id) {
                    tracing::warn!("download completion for unknown task {:?}", task.id);
                }
                if state.stopped {
                    return;
                }
                state.extract.enqueue_pending(ExtractItem {
                    id: task.id,
                    url: task.url,
                    body: task.body,
                });
            }

            Completion::Extract { id, links } => {
                let mut state = self.state.lock().unwrap();
                if !state.extract.remove_in_flight(id) {
                    tracing::warn!("extract completion for unknown item {:?}", id);
                }
                state.pages_done += 1;
                if state.stopped {
                    return;
                }

                let mut accepted = 0usize;
                for link in &links {
                    if !self.config.matches_site(link) {
                        continue;
                    }
                    if state.accept_url(link) {
                        accepted += 1;
                    }
                }
                if accepted > 0 {
                    tracing::debug!(
                        "accepted {} of {} discovered links",
                        accepted,
                        links.len()
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_accept_url_enqueues_once() {
        let mut state = PipelineState::new(SeenSet::new(1 << 16, 2));
        let target = url("https://example.test/a");

        assert!(state.accept_url(&target));
        assert!(!state.accept_url(&target));
        assert_eq!(state.download.pending_len(), 1);
    }

    #[test]
    fn test_accept_url_allocates_distinct_ids() {
        let mut state = PipelineState::new(SeenSet::new(1 << 16, 2));
        assert!(state.accept_url(&url("https://example.test/a")));
        assert!(state.accept_url(&url("https://example.test/b")));

        let first = state.download.take_pending().unwrap();
        let second = state.download.take_pending().unwrap();
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_exhausted_only_when_all_queues_empty() {
        let mut state = PipelineState::new(SeenSet::new(1 << 16, 2));
        assert!(state.is_exhausted());

        state.accept_url(&url("https://example.test/a"));
        assert!(!state.is_exhausted());

        let task = state.download.take_pending().unwrap();
        state.download.mark_in_flight(task.id);
        assert!(!state.is_exhausted());

        state.download.remove_in_flight(task.id);
        state.extract.enqueue_pending(ExtractItem {
            id: task.id,
            url: task.url,
            body: task.body,
        });
        assert!(!state.is_exhausted());

        let item = state.extract.take_pending().unwrap();
        state.extract.mark_in_flight(item.id);
        assert!(!state.is_exhausted());

        state.extract.remove_in_flight(item.id);
        assert!(state.is_exhausted());
    }

    #[test]
    fn test_stop_clears_pending_and_blocks_accept() {
        let mut state = PipelineState::new(SeenSet::new(1 << 16, 2));
        state.accept_url(&url("https://example.test/a"));
        state.accept_url(&url("https://example.test/b"));

        state.stop();

        assert!(state.download.pending_is_empty());
        assert!(!state.accept_url(&url("https://example.test/c")));
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut state = PipelineState::new(SeenSet::new(1 << 16, 2));
        state.accept_url(&url("https://example.test/a"));

        let snapshot = PipelineSnapshot::of(&state);
        assert_eq!(snapshot.download_pending, 1);
        assert_eq!(snapshot.download_in_flight, 0);
        assert_eq!(snapshot.pages_done, 0);
        assert!(!snapshot.stopped);
    }
}
