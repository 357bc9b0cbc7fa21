//! Crawl coordinator - breadth-first traversal from a seed URL
//!
//! Levels are processed in order. Within a level up to `concurrency` fetches
//! may be in flight, but results are consumed in frontier order, so the
//! emitted sequence matches a sequential BFS.

use crate::crawler::frontier::{Frontier, QueuedUrl};
use crate::document::{discover_links, parse_document};
use crate::fetcher::Fetcher;
use crate::GleanError;
use futures::stream::{self, StreamExt};
use std::time::Instant;

/// A page retrieved during a crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawledPage {
    /// The URL as it was queued
    pub url: String,

    /// Link hops from the seed (0 for the seed)
    pub depth: u32,

    /// Raw page body
    pub body: String,
}

/// A frontier item that was skipped
#[derive(Debug)]
pub struct CrawlFailure {
    /// The URL that could not be fetched
    pub url: String,

    /// Link hops from the seed
    pub depth: u32,

    /// Why it was skipped
    pub error: GleanError,
}

/// Everything a crawl produced, in breadth-first order
#[derive(Debug, Default)]
pub struct CrawlOutcome {
    pub pages: Vec<CrawledPage>,
    pub failures: Vec<CrawlFailure>,
}

impl CrawlOutcome {
    /// URLs of the fetched pages, in emission order
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().map(|page| page.url.as_str())
    }
}

/// Breadth-first crawler over a shared `Fetcher`
pub struct Crawler<'a> {
    fetcher: &'a Fetcher,
    concurrency: usize,
}

impl<'a> Crawler<'a> {
    /// Creates a sequential crawler
    pub fn new(fetcher: &'a Fetcher) -> Self {
        Self {
            fetcher,
            concurrency: 1,
        }
    }

    /// Sets how many fetches of one level may be in flight (minimum 1)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Crawls from `seed`, following links up to `max_depth` hops
    ///
    /// Per-URL failures (robots denial, HTTP or transport errors, missing
    /// renderer) are logged, recorded in `CrawlOutcome::failures` and
    /// skipped.
    ///
    /// # Errors
    ///
    /// Any other error, such as a cache I/O failure, aborts the crawl.
    pub async fn crawl(
        &self,
        seed: &str,
        max_depth: u32,
        render_js: bool,
    ) -> Result<CrawlOutcome, GleanError> {
        tracing::info!("Starting crawl of {} (max depth {})", seed, max_depth);
        let start_time = Instant::now();

        let mut frontier = Frontier::new(seed, max_depth);
        let mut outcome = CrawlOutcome::default();

        loop {
            let level = frontier.next_level();
            let Some(depth) = level.first().map(|queued| queued.depth) else {
                break;
            };
            tracing::debug!("Fetching {} URLs at depth {}", level.len(), depth);

            let fetcher = self.fetcher;
            let mut results = stream::iter(level.into_iter().map(move |queued| async move {
                let result = fetcher.fetch(&queued.url, render_js).await;
                (queued, result)
            }))
            .buffered(self.concurrency);

            while let Some((queued, result)) = results.next().await {
                match result {
                    Ok(body) => {
                        let added = expand(&mut frontier, &queued, &body);
                        tracing::debug!(
                            "Fetched {} ({} bytes, {} new links)",
                            queued.url,
                            body.len(),
                            added
                        );
                        outcome.pages.push(CrawledPage {
                            url: queued.url,
                            depth: queued.depth,
                            body,
                        });
                    }
                    Err(e) if e.is_per_url() => {
                        tracing::warn!("Skipping {}: {}", queued.url, e);
                        outcome.failures.push(CrawlFailure {
                            url: queued.url,
                            depth: queued.depth,
                            error: e,
                        });
                    }
                    Err(e) => {
                        tracing::error!("Aborting crawl at {}: {}", queued.url, e);
                        return Err(e);
                    }
                }
            }

            let elapsed = start_time.elapsed();
            tracing::info!(
                "Progress: depth {} done, {} pages fetched, {} skipped, {} in frontier, {:.2} pages/sec",
                depth,
                outcome.pages.len(),
                outcome.failures.len(),
                frontier.len(),
                outcome.pages.len() as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
            );
        }

        tracing::info!(
            "Crawl completed: {} pages fetched, {} skipped in {:?}",
            outcome.pages.len(),
            outcome.failures.len(),
            start_time.elapsed()
        );

        Ok(outcome)
    }
}

/// Queues the links of a fetched page if it still has depth budget
fn expand(frontier: &mut Frontier, queued: &QueuedUrl, body: &str) -> usize {
    if queued.remaining == 0 {
        return 0;
    }
    let document = parse_document(body, &queued.url);
    frontier.expand(queued, discover_links(&document, &queued.url))
}

/// Runs a sequential crawl
///
/// # Example
///
/// ```no_run
/// use sumi_glean::config::default_config;
/// use sumi_glean::crawler::crawl;
/// use sumi_glean::fetcher::Fetcher;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = default_config()?;
/// let fetcher = Fetcher::new(&config.user_agent, &config.fetcher)?;
/// let outcome = crawl(&fetcher, "https://example.com/", 1, false).await?;
/// for page in &outcome.pages {
///     println!("{} ({} bytes)", page.url, page.body.len());
/// }
/// # Ok(())
/// # }
/// ```
pub async fn crawl(
    fetcher: &Fetcher,
    seed: &str,
    max_depth: u32,
    render_js: bool,
) -> Result<CrawlOutcome, GleanError> {
    Crawler::new(fetcher).crawl(seed, max_depth, render_js).await
}
