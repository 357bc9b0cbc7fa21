//! Per-origin robots.txt gate
//!
//! The gate fetches `{origin}/robots.txt` the first time a URL from that
//! origin is checked and keeps the parsed policy for its whole lifetime.
//! There is no revalidation: a policy, once memoized, is never refreshed.
//!
//! Each origin gets its own cell, so a slow robots.txt only holds up
//! requests for that origin.

use crate::robots::parser::{robots_token, ParsedRobots};
use crate::url::{extract_origin, robots_url};
use reqwest::{Client, StatusCode};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};
use url::Url;

/// Memoizing robots.txt gate keyed by origin
pub struct RobotsGate {
    client: Client,
    policies: Mutex<HashMap<String, Arc<OnceCell<ParsedRobots>>>>,
}

impl RobotsGate {
    /// Creates a gate that fetches robots.txt files with `client`
    pub fn new(client: Client) -> Self {
        Self {
            client,
            policies: Mutex::new(HashMap::new()),
        }
    }

    /// Checks whether `user_agent` may fetch `url`
    ///
    /// URLs that do not parse or have no host are allowed here; they fail
    /// later at fetch time.
    pub async fn allowed(&self, url: &str, user_agent: &str) -> bool {
        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(_) => return true,
        };
        let origin = match extract_origin(&parsed) {
            Some(origin) => origin,
            None => return true,
        };

        let cell = self.cell_for(&origin).await;
        let policy = cell.get_or_init(|| self.fetch_policy(&origin)).await;
        policy.is_allowed(url, robots_token(user_agent))
    }

    /// Number of origins with a memoized policy
    pub async fn cached_origins(&self) -> usize {
        self.policies
            .lock()
            .await
            .values()
            .filter(|cell| cell.initialized())
            .count()
    }

    /// Returns the policy cell for `origin`, creating an empty one on first use
    ///
    /// The map lock is released before the cell is filled. Concurrent first
    /// requests for one origin wait on the same cell and download robots.txt
    /// once.
    async fn cell_for(&self, origin: &str) -> Arc<OnceCell<ParsedRobots>> {
        let mut policies = self.policies.lock().await;
        Arc::clone(policies.entry(origin.to_string()).or_default())
    }

    /// Downloads and parses robots.txt for an origin
    ///
    /// Transport failures and non-200 responses resolve to allow-all. This
    /// is never retried for the lifetime of the gate.
    async fn fetch_policy(&self, origin: &str) -> ParsedRobots {
        let url = robots_url(origin);
        tracing::debug!("Fetching robots.txt: {}", url);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("robots.txt unavailable for {} ({}), allowing all", origin, e);
                return ParsedRobots::allow_all();
            }
        };

        if response.status() != StatusCode::OK {
            tracing::debug!(
                "robots.txt for {} returned HTTP {}, allowing all",
                origin,
                response.status().as_u16()
            );
            return ParsedRobots::allow_all();
        }

        match response.text().await {
            Ok(body) => ParsedRobots::from_content(&body),
            Err(e) => {
                tracing::warn!("Failed to read robots.txt for {} ({}), allowing all", origin, e);
                ParsedRobots::allow_all()
            }
        }
    }
}
