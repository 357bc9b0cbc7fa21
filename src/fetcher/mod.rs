//! Fetcher module for robots-compliant, cached page retrieval
//!
//! This module contains:
//! - HTTP client construction and plain GET retrieval
//! - The content-addressed disk cache
//! - The pluggable JavaScript rendering backend
//!
//! # Request Flow
//!
//! 1. Ask the robots gate; a disallowed URL fails with `PermissionDenied`
//!    before the cache or network is touched, even if the page is cached
//! 2. If a cache is configured and holds the URL, return the cached body
//! 3. GET the URL (or render it when JS rendering is requested)
//! 4. Persist the body to the cache, then return it

mod cache;
mod client;
mod render;

pub use cache::{cache_key, PageStore};
pub use client::{build_http_client, http_get};
#[cfg(feature = "chromium")]
pub use render::ChromiumRenderer;
pub use render::Renderer;

use crate::config::{FetcherConfig, UserAgentConfig};
use crate::robots::RobotsGate;
use crate::GleanError;
use reqwest::Client;
use std::sync::Arc;

/// Robots-compliant page fetcher with optional disk cache
pub struct Fetcher {
    client: Client,
    user_agent: String,
    robots: RobotsGate,
    store: Option<PageStore>,
    renderer: Option<Arc<dyn Renderer>>,
}

impl Fetcher {
    /// Creates a fetcher from configuration
    ///
    /// Opens (and creates) the cache directory when one is configured.
    pub fn new(user_agent: &UserAgentConfig, config: &FetcherConfig) -> Result<Self, GleanError> {
        let client = build_http_client(user_agent, config).map_err(|e| {
            GleanError::Configuration(format!("Failed to build HTTP client: {}", e))
        })?;

        let store = match &config.cache_dir {
            Some(dir) => {
                tracing::debug!("Using page cache at {}", dir.display());
                Some(PageStore::open(dir)?)
            }
            None => None,
        };

        Ok(Self {
            robots: RobotsGate::new(client.clone()),
            client,
            user_agent: user_agent.header_value(),
            store,
            renderer: None,
        })
    }

    /// Attaches a rendering backend used for `render_js` fetches
    pub fn with_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// The `User-Agent` sent with requests and matched against robots.txt
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// The robots gate backing this fetcher
    pub fn robots(&self) -> &RobotsGate {
        &self.robots
    }

    /// The page cache, if configured
    pub fn store(&self) -> Option<&PageStore> {
        self.store.as_ref()
    }

    /// Fetches the body of `url`
    ///
    /// # Errors
    ///
    /// * `PermissionDenied` - robots.txt disallows the URL
    /// * `HttpStatus` / `Fetch` - the network retrieval failed
    /// * `Configuration` - `render_js` requested without a renderer
    /// * `Io` - the cache could not be read or written
    pub async fn fetch(&self, url: &str, render_js: bool) -> Result<String, GleanError> {
        if !self.robots.allowed(url, &self.user_agent).await {
            tracing::info!("URL {} disallowed by robots.txt", url);
            return Err(GleanError::PermissionDenied {
                url: url.to_string(),
            });
        }

        if let Some(store) = &self.store {
            if let Some(body) = store.get(url)? {
                tracing::debug!("Cache hit for {}", url);
                return Ok(body);
            }
        }

        let body = if render_js {
            let renderer = self.renderer.as_ref().ok_or_else(|| {
                GleanError::Configuration("JS rendering requested but no renderer is configured".to_string())
            })?;
            tracing::debug!("Rendering {}", url);
            renderer.render(url).await?
        } else {
            tracing::debug!("Fetching {}", url);
            http_get(&self.client, url).await?
        };

        if let Some(store) = &self.store {
            store.put(url, &body)?;
        }

        Ok(body)
    }
}
