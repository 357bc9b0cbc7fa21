//! Crawler module for breadth-first link following
//!
//! This module contains:
//! - The frontier (visited set plus per-level FIFO)
//! - The coordinator that drives fetching and link expansion
//!
//! The crawler never fetches a URL twice in one crawl, never goes deeper than
//! the requested depth, and skips frontier items whose fetch fails.

mod coordinator;
mod frontier;

pub use coordinator::{crawl, CrawlFailure, CrawlOutcome, CrawledPage, Crawler};
pub use frontier::{Frontier, QueuedUrl};
