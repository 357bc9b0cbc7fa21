//! Configuration module for Sumi-Glean
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use sumi_glean::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("glean.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, FetcherConfig, LlmConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{
    apply_env_overrides, default_config, load_config, parse_config, API_KEY_ENV, BASE_URL_ENV,
    MODEL_ENV,
};
