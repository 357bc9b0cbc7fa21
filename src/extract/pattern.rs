//! Deterministic pattern-matching extractors
//!
//! Each matcher scans normalized text and returns matches in order of first
//! occurrence with exact duplicates removed.

use crate::extract::ContactDetails;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

// Regex patterns for contact fields
const EMAIL_PATTERN: &str = r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}";
// A bare-digit prefix is only a country code when it is `+`-led or a lone 1,
// so a preceding ZIP or suite number is never absorbed into the match.
const PHONE_PATTERN: &str =
    r"(?:\+\d{1,3}[\s.\-]?|\b1[\s.\-])?(?:\(\d{3}\)|\b\d{3})[\s.\-]?\d{3}[\s.\-]?\d{4}\b";
const ADDRESS_PATTERN: &str = concat!(
    r"\b\d{1,6}\s+(?:[A-Z0-9][A-Za-z0-9.'\-]*\s+){1,5}?",
    r"(?:Street|St|Road|Rd|Avenue|Ave|Boulevard|Blvd|Lane|Ln|Drive|Dr|Court|Ct|",
    r"Place|Pl|Terrace|Way|Parkway|Pkwy|Highway|Hwy|Square|Sq)\b\.?"
);
const SOCIAL_PATTERN: &str = concat!(
    r"(?i)\b(?:https?://)?(?:www\.)?(?:",
    r"linkedin\.com/(?:company|in|pub|school)/[A-Za-z0-9_%.\-]+",
    r"|(?:twitter|x)\.com/[A-Za-z0-9_]+",
    r"|facebook\.com/[A-Za-z0-9_.\-]+",
    r"|instagram\.com/[A-Za-z0-9_.]+",
    r"|youtube\.com/(?:channel/|c/|user/|@)[A-Za-z0-9_.\-]+",
    r"|github\.com/[A-Za-z0-9_\-]+",
    r"|tiktok\.com/@[A-Za-z0-9_.]+",
    r")"
);

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("Failed to compile email regex"));
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PHONE_PATTERN).expect("Failed to compile phone regex"));
static ADDRESS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(ADDRESS_PATTERN).expect("Failed to compile address regex"));
static SOCIAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(SOCIAL_PATTERN).expect("Failed to compile social regex"));

/// Characters stripped from the end of address and profile matches
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')'];

/// Runs all four matchers over `text`
pub fn extract_contacts(text: &str) -> ContactDetails {
    ContactDetails {
        emails: extract_emails(text),
        phone_numbers: extract_phone_numbers(text),
        addresses: extract_addresses(text),
        social_media: extract_social_profiles(text),
    }
}

/// Extracts email addresses
///
/// # Example
///
/// ```
/// use sumi_glean::extract::pattern::extract_emails;
///
/// assert_eq!(
///     extract_emails("a@x.com b@x.com a@x.com"),
///     vec!["a@x.com", "b@x.com"]
/// );
/// ```
pub fn extract_emails(text: &str) -> Vec<String> {
    dedup_in_order(EMAIL_RE.find_iter(text).map(|m| m.as_str().to_string()))
}

/// Extracts phone numbers, normalized to digits only
///
/// Punctuation variants of the same number collapse to one entry.
///
/// # Example
///
/// ```
/// use sumi_glean::extract::pattern::extract_phone_numbers;
///
/// assert_eq!(
///     extract_phone_numbers("Call (123) 456-7890 or 987-654-3210."),
///     vec!["1234567890", "9876543210"]
/// );
/// ```
pub fn extract_phone_numbers(text: &str) -> Vec<String> {
    dedup_in_order(PHONE_RE.find_iter(text).map(|m| digits_only(m.as_str())))
}

/// Extracts street addresses with trailing punctuation trimmed
///
/// # Example
///
/// ```
/// use sumi_glean::extract::pattern::extract_addresses;
///
/// assert_eq!(
///     extract_addresses("Locations: 123 Main St., 456 Elm Road"),
///     vec!["123 Main St", "456 Elm Road"]
/// );
/// ```
pub fn extract_addresses(text: &str) -> Vec<String> {
    dedup_in_order(
        ADDRESS_RE
            .find_iter(text)
            .map(|m| trim_trailing_punctuation(m.as_str())),
    )
}

/// Extracts social profile URLs for known platforms
pub fn extract_social_profiles(text: &str) -> Vec<String> {
    dedup_in_order(
        SOCIAL_RE
            .find_iter(text)
            .map(|m| trim_trailing_punctuation(m.as_str())),
    )
}

/// Removes exact duplicates, keeping the first occurrence
pub(crate) fn dedup_in_order<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| !item.is_empty() && seen.insert(item.clone()))
        .collect()
}

fn digits_only(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

fn trim_trailing_punctuation(s: &str) -> String {
    s.trim_end_matches(TRAILING_PUNCTUATION).to_string()
}
