//! Breadth-first crawl frontier
//!
//! Holds the visited set and the queue of URLs still to fetch, grouped by
//! BFS level. A URL enters the visited set when it is first queued, so it is
//! fetched at most once and always at the depth of its first discovery.

use crate::url::normalize_url;
use std::collections::{HashSet, VecDeque};

/// A URL waiting to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedUrl {
    /// The URL to fetch
    pub url: String,

    /// Distance from the seed (0 for the seed itself)
    pub depth: u32,

    /// How many more link hops may follow from this page
    pub remaining: u32,
}

/// Visited set plus FIFO of pending URLs
#[derive(Debug)]
pub struct Frontier {
    visited: HashSet<String>,
    queue: VecDeque<QueuedUrl>,
}

impl Frontier {
    /// Creates a frontier holding only the seed
    ///
    /// The seed is normalized the same way discovered links are, so
    /// `https://a.com` and a link back to `https://a.com/` are one page.
    pub fn new(seed: &str, max_depth: u32) -> Self {
        let seed = normalize_url(seed);
        let mut visited = HashSet::new();
        visited.insert(seed.clone());

        let mut queue = VecDeque::new();
        queue.push_back(QueuedUrl {
            url: seed,
            depth: 0,
            remaining: max_depth,
        });

        Self { visited, queue }
    }

    /// Removes and returns every queued URL of the shallowest depth
    ///
    /// The queue is FIFO and depths never decrease along it, so this is the
    /// next BFS level in discovery order.
    pub fn next_level(&mut self) -> Vec<QueuedUrl> {
        let Some(depth) = self.queue.front().map(|q| q.depth) else {
            return Vec::new();
        };

        let mut level = Vec::new();
        while self.queue.front().is_some_and(|q| q.depth == depth) {
            if let Some(queued) = self.queue.pop_front() {
                level.push(queued);
            }
        }
        level
    }

    /// Queues links discovered on `parent`
    ///
    /// Does nothing if `parent` has no remaining depth. Returns the number of
    /// links that were new.
    pub fn expand<I>(&mut self, parent: &QueuedUrl, links: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        if parent.remaining == 0 {
            return 0;
        }

        let mut added = 0;
        for link in links {
            if self.visited.insert(link.clone()) {
                self.queue.push_back(QueuedUrl {
                    url: link,
                    depth: parent.depth + 1,
                    remaining: parent.remaining - 1,
                });
                added += 1;
            }
        }
        added
    }

    /// Number of URLs waiting to be fetched
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns true if nothing is left to fetch
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of distinct URLs ever queued, including the seed
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}
