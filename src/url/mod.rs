//! URL handling module for Sumi-Glean
//!
//! Origin extraction (the robots.txt memo key) and link resolution.

mod normalize;
mod origin;

pub use normalize::{normalize_url, resolve_link};
pub use origin::{extract_origin, robots_url};
