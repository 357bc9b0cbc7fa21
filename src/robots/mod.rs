//! Robots.txt handling module
//!
//! This module provides functionality for fetching, parsing, and memoizing robots.txt files.
//! The fetcher consults it before any cache or network access.

mod gate;
mod parser;

pub use gate::RobotsGate;
pub use parser::{robots_token, ParsedRobots};
