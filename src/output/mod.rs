//! Output module for presenting extraction results
//!
//! This module handles:
//! - Plain console listings of contact details and page reports
//! - JSON serialization, optionally written to a file

mod console;
mod json;

pub use console::{
    format_contacts, format_crawl_report, format_page_report, print_contacts, print_crawl_report,
    print_page_report,
};
pub use json::to_json;
