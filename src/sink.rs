//! Page sink: the injected strategy for handling fetched pages.

use url::Url;

/// Receives each successfully fetched page exactly once.
///
/// Implementations decide what to do with the bytes (index, persist,
/// count, ...). The pipeline invokes this outside its lock, so a slow sink
/// delays its own extract worker but never blocks dispatch. A sink that
/// wants to feed URLs back into the crawl must go through
/// [`CrawlHandle::seed_url`](crate::crawler::CrawlHandle::seed_url) rather
/// than manipulating queues directly.
pub trait PageSink: Send + Sync {
    /// Called with the raw page bytes and the URL they were fetched from.
    fn page(&self, body: &[u8], url: &Url);
}

/// Closures work as sinks, which keeps tests short.
impl<F> PageSink for F
where
    F: Fn(&[u8], &Url) + Send + Sync,
{
    fn page(&self, body: &[u8], url: &Url) {
        self(body, url)
    }
}

/// Sink that logs each page's URL and size. The CLI default.
pub struct LogSink;

impl PageSink for LogSink {
    fn page(&self, body: &[u8], url: &Url) {
        tracing::info!("fetched {} ({} bytes)", url, body.len());
    }
}
