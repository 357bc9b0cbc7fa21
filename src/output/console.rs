//! Console listings
//!
//! Each field prints as a `key:` line followed by one `  - value` line per
//! entry, in the record's order.

use crate::extract::ContactDetails;
use crate::pipeline::{CrawlReport, PageReport};
use std::fmt::Write;

/// Formats contact details as a plain listing
///
/// # Example
///
/// ```
/// use sumi_glean::extract::ContactDetails;
/// use sumi_glean::output::format_contacts;
///
/// let details = ContactDetails {
///     emails: vec!["a@x.com".to_string()],
///     ..ContactDetails::default()
/// };
/// assert_eq!(
///     format_contacts(&details),
///     "emails:\n  - a@x.com\nphone_numbers:\naddresses:\nsocial_media:\n"
/// );
/// ```
pub fn format_contacts(details: &ContactDetails) -> String {
    let mut out = String::new();
    for (key, values) in details.fields() {
        push_list(&mut out, key, values);
    }
    out
}

/// Formats one page report: URL, contacts, custom fields and summary
pub fn format_page_report(page: &PageReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "url: {}", page.url);
    out.push_str(&format_contacts(&page.contacts));

    if let Some(custom) = &page.custom {
        for (name, values) in custom {
            push_list(&mut out, name, values);
        }
    }

    if let Some(summary) = &page.summary {
        out.push_str("summary:\n");
        for line in summary.lines() {
            let _ = writeln!(out, "  {}", line);
        }
    }
    out
}

/// Formats a crawl report, one block per page, then the skipped URLs
pub fn format_crawl_report(report: &CrawlReport) -> String {
    let blocks: Vec<String> = report.pages.iter().map(format_page_report).collect();
    let mut out = blocks.join("\n");

    if !report.skipped.is_empty() {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str("skipped:\n");
        for page in &report.skipped {
            let _ = writeln!(out, "  - {} ({})", page.url, page.reason);
        }
    }
    out
}

pub fn print_contacts(details: &ContactDetails) {
    print!("{}", format_contacts(details));
}

pub fn print_page_report(page: &PageReport) {
    print!("{}", format_page_report(page));
}

pub fn print_crawl_report(report: &CrawlReport) {
    print!("{}", format_crawl_report(report));
}

fn push_list(out: &mut String, key: &str, values: &[String]) {
    let _ = writeln!(out, "{}:", key);
    for value in values {
        let _ = writeln!(out, "  - {}", value);
    }
}
