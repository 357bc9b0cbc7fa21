//! robots.txt policy matching
//!
//! Rules are kept as raw text and evaluated with Google's matcher on every
//! check; a gate memoizes one policy per origin so parsing cost is small.

use robotstxt::DefaultMatcher;

/// One origin's robots.txt policy
#[derive(Debug, Clone)]
pub struct ParsedRobots {
    content: String,
    allow_all: bool,
}

impl ParsedRobots {
    /// Policy backed by a downloaded robots.txt body
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
            allow_all: false,
        }
    }

    /// Policy used when robots.txt is missing or unreachable
    pub fn allow_all() -> Self {
        Self {
            content: String::new(),
            allow_all: true,
        }
    }

    /// True when no rule can ever deny a URL
    pub fn is_allow_all(&self) -> bool {
        self.allow_all || self.content.trim().is_empty()
    }

    /// Checks `url` (absolute, or a bare path) for the product token `agent`
    pub fn is_allowed(&self, url: &str, agent: &str) -> bool {
        if self.is_allow_all() {
            return true;
        }
        DefaultMatcher::default().one_agent_allowed_by_robots(&self.content, agent, url)
    }
}

/// Reduces a full `User-Agent` header value to the token matched against
/// robots.txt `User-agent:` lines
///
/// `"sumi-glean/0.1 (+https://example.com)"` becomes `"sumi-glean"`.
pub fn robots_token(user_agent: &str) -> &str {
    let trimmed = user_agent.trim();
    let end = trimmed
        .find(|c: char| c == '/' || c.is_whitespace())
        .unwrap_or(trimmed.len());
    &trimmed[..end]
}
