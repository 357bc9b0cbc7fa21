//! End-to-end fetch, crawl and extract pipeline
//!
//! A `Pipeline` owns the fetcher and, when requested, the text service
//! handle. The handle is dropped with the pipeline, so it is released on
//! every exit path; extraction and summarization only borrow it.
//!
//! Request options are validated before any network work starts.

use crate::config::Config;
use crate::crawler::Crawler;
use crate::document::{parse_document, Document};
use crate::extract::{
    apply_patterns, compile_patterns, extract, gather_text, summarize, ContactDetails,
    ExtractionMethod,
};
use crate::fetcher::{Fetcher, Renderer};
use crate::llm::{LlmService, TextService};
use crate::GleanError;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// What to do with each fetched page
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Strategy name, `"pattern"` or `"service"`
    pub method: String,

    /// Fetch through the rendering backend
    pub render_js: bool,

    /// Ask the text service for an outreach summary
    pub summarize: bool,

    /// Named caller-supplied patterns
    pub patterns: Vec<(String, String)>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            method: "pattern".to_string(),
            render_js: false,
            summarize: false,
            patterns: Vec::new(),
        }
    }
}

/// Results for one page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageReport {
    pub url: String,

    pub contacts: ContactDetails,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom: Option<BTreeMap<String, Vec<String>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// A page that was fetched or attempted but produced no report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedPage {
    pub url: String,
    pub reason: String,
}

/// Results of a crawl, pages in breadth-first order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CrawlReport {
    pub pages: Vec<PageReport>,
    pub skipped: Vec<SkippedPage>,
}

impl CrawlReport {
    /// URL to contact details mapping
    pub fn contacts_by_url(&self) -> BTreeMap<&str, &ContactDetails> {
        self.pages
            .iter()
            .map(|page| (page.url.as_str(), &page.contacts))
            .collect()
    }
}

/// Options resolved against the pipeline's resources
struct Prepared<'a> {
    method: ExtractionMethod<'a>,
    patterns: Option<Vec<(String, Regex)>>,
    summarizer: Option<&'a dyn TextService>,
}

/// Owns the resources shared by single-page runs and crawls
pub struct Pipeline {
    config: Config,
    fetcher: Fetcher,
    service: Option<Box<dyn TextService>>,
}

impl Pipeline {
    /// Builds the fetcher from `config`
    ///
    /// The text service is not opened; see `open_service`.
    pub fn new(config: Config) -> Result<Self, GleanError> {
        let fetcher = Fetcher::new(&config.user_agent, &config.fetcher)?;
        Ok(Self {
            config,
            fetcher,
            service: None,
        })
    }

    /// Opens the language model service from the `[llm]` section
    ///
    /// # Errors
    ///
    /// `Configuration` if no API key is configured.
    pub fn open_service(mut self) -> Result<Self, GleanError> {
        let service = LlmService::new(&self.config.llm)?;
        tracing::info!("Using text service model {}", service.model());
        self.service = Some(Box::new(service));
        Ok(self)
    }

    /// Uses `service` for service extraction and summaries
    pub fn with_service(mut self, service: Box<dyn TextService>) -> Self {
        self.service = Some(service);
        self
    }

    /// Attaches a rendering backend for `render_js` requests
    pub fn with_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.fetcher = self.fetcher.with_renderer(renderer);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    /// Returns true if a text service is attached
    pub fn has_service(&self) -> bool {
        self.service.is_some()
    }

    fn prepare(&self, options: &ExtractOptions) -> Result<Prepared<'_>, GleanError> {
        let service = self.service.as_deref();
        let method =
            ExtractionMethod::from_name(&options.method, service, self.config.llm.chunk_size)?;

        let patterns = if options.patterns.is_empty() {
            None
        } else {
            Some(compile_patterns(options.patterns.iter().map(|(k, v)| (k, v)))?)
        };

        let summarizer = if options.summarize {
            Some(service.ok_or_else(|| {
                GleanError::Configuration(
                    "summaries require a text service but none is available".to_string(),
                )
            })?)
        } else {
            None
        };

        Ok(Prepared {
            method,
            patterns,
            summarizer,
        })
    }

    /// Fetches one page and extracts from it
    ///
    /// # Errors
    ///
    /// Every failure is surfaced: invalid options, robots denial, fetch
    /// errors and text service errors.
    pub async fn run(&self, url: &str, options: &ExtractOptions) -> Result<PageReport, GleanError> {
        let prepared = self.prepare(options)?;
        let body = self.fetcher.fetch(url, options.render_js).await?;
        let document = parse_document(&body, url);
        report(&document, &prepared).await
    }

    /// Crawls from `url` and extracts from every fetched page
    ///
    /// Pages that fail to fetch or whose extraction fails are listed in
    /// `CrawlReport::skipped`; the rest are still reported.
    pub async fn crawl(
        &self,
        url: &str,
        max_depth: u32,
        options: &ExtractOptions,
    ) -> Result<CrawlReport, GleanError> {
        let prepared = self.prepare(options)?;

        let outcome = Crawler::new(&self.fetcher)
            .with_concurrency(self.config.crawler.concurrency)
            .crawl(url, max_depth, options.render_js)
            .await?;

        let mut crawl_report = CrawlReport {
            pages: Vec::with_capacity(outcome.pages.len()),
            skipped: outcome
                .failures
                .into_iter()
                .map(|failure| SkippedPage {
                    url: failure.url,
                    reason: failure.error.to_string(),
                })
                .collect(),
        };

        for page in outcome.pages {
            let document = parse_document(&page.body, &page.url);
            match report(&document, &prepared).await {
                Ok(page_report) => crawl_report.pages.push(page_report),
                Err(e) => {
                    tracing::warn!("Extraction failed for {}: {}", page.url, e);
                    crawl_report.skipped.push(SkippedPage {
                        url: page.url,
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "Extracted contacts from {} pages ({} skipped)",
            crawl_report.pages.len(),
            crawl_report.skipped.len()
        );
        Ok(crawl_report)
    }
}

async fn report(document: &Document, prepared: &Prepared<'_>) -> Result<PageReport, GleanError> {
    let contacts = extract(document, prepared.method).await?;

    let needs_text = prepared.patterns.is_some() || prepared.summarizer.is_some();
    let text = if needs_text {
        gather_text(document)
    } else {
        String::new()
    };

    let custom = prepared
        .patterns
        .as_ref()
        .map(|patterns| apply_patterns(&text, patterns));

    let summary = match prepared.summarizer {
        Some(service) => Some(summarize(service, &text).await?),
        None => None,
    };

    Ok(PageReport {
        url: document.url().to_string(),
        contacts,
        custom,
        summary,
    })
}
