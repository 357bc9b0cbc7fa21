//! Sumi-Glean: a polite contact gleaner
//!
//! This crate fetches web pages while respecting robots.txt, follows links
//! breadth-first to a bounded depth, and extracts contact details (emails,
//! phone numbers, postal addresses, social profiles) from the page content,
//! either with local patterns or by delegating to a language model.

pub mod config;
pub mod crawler;
pub mod document;
pub mod extract;
pub mod fetcher;
pub mod llm;
pub mod output;
pub mod pipeline;
pub mod robots;
pub mod url;

use thiserror::Error;

/// Main error type for Sumi-Glean operations
#[derive(Debug, Error)]
pub enum GleanError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL disallowed by robots.txt: {url}")]
    PermissionDenied { url: String },

    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid extraction pattern '{name}': {source}")]
    InvalidPattern { name: String, source: regex::Error },

    #[error("Text service error: {0}")]
    Service(String),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GleanError {
    /// Returns true for errors that only affect a single URL
    ///
    /// The crawler skips frontier items failing with one of these and keeps
    /// going; anything else aborts the crawl.
    pub fn is_per_url(&self) -> bool {
        matches!(
            self,
            Self::PermissionDenied { .. }
                | Self::Fetch { .. }
                | Self::HttpStatus { .. }
                | Self::Configuration(_)
                | Self::UrlParse(_)
        )
    }
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
}

/// Result type alias for Sumi-Glean operations
pub type Result<T> = std::result::Result<T, GleanError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, CrawlOutcome, CrawledPage, Crawler};
pub use document::{Document, DocumentBuilder, NodeId, PageNode};
pub use extract::{extract, extract_custom, summarize, ContactDetails, ExtractionMethod};
pub use fetcher::Fetcher;
pub use llm::{LlmService, TextService};
pub use pipeline::{CrawlReport, ExtractOptions, PageReport, Pipeline};
pub use robots::RobotsGate;
