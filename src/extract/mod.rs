//! Extraction engine
//!
//! Turns a parsed `Document` into `ContactDetails`:
//! 1. Gather the content text (boilerplate subtrees pruned) and normalize
//!    its whitespace
//! 2. Run the selected strategy: local patterns or the text service
//! 3. Assemble the record
//!
//! Custom pattern extraction and summarization work on the same text.

mod custom;
pub mod pattern;
mod service;
mod text;

pub use custom::{apply_patterns, compile_patterns};
pub use service::{extract_with_service, parse_service_response};
pub use text::{gather_text, normalize_whitespace};

use crate::document::Document;
use crate::llm::{TextService, SUMMARY_INSTRUCTION};
use crate::GleanError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Contact information found on a page
///
/// Each field holds unique values in order of first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactDetails {
    pub emails: Vec<String>,
    pub phone_numbers: Vec<String>,
    pub addresses: Vec<String>,
    pub social_media: Vec<String>,
}

impl ContactDetails {
    /// Returns true if every field is empty
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
            && self.phone_numbers.is_empty()
            && self.addresses.is_empty()
            && self.social_media.is_empty()
    }

    /// Appends values from `other` that are not already present
    pub fn merge(&mut self, other: ContactDetails) {
        merge_field(&mut self.emails, other.emails);
        merge_field(&mut self.phone_numbers, other.phone_numbers);
        merge_field(&mut self.addresses, other.addresses);
        merge_field(&mut self.social_media, other.social_media);
    }

    /// Field names and values in their serialized order
    pub fn fields(&self) -> [(&'static str, &[String]); 4] {
        [
            ("emails", self.emails.as_slice()),
            ("phone_numbers", self.phone_numbers.as_slice()),
            ("addresses", self.addresses.as_slice()),
            ("social_media", self.social_media.as_slice()),
        ]
    }
}

fn merge_field(target: &mut Vec<String>, incoming: Vec<String>) {
    let mut seen: HashSet<String> = target.iter().cloned().collect();
    for value in incoming {
        if seen.insert(value.clone()) {
            target.push(value);
        }
    }
}

/// Extraction strategy
#[derive(Clone, Copy)]
pub enum ExtractionMethod<'a> {
    /// Deterministic local pattern matching
    Pattern,

    /// Delegation to a text-understanding service
    Service {
        service: &'a dyn TextService,
        /// Characters per request; 0 sends the whole text at once
        chunk_size: usize,
    },
}

impl<'a> ExtractionMethod<'a> {
    /// Service strategy sending the whole text in one request
    pub fn service(service: &'a dyn TextService) -> Self {
        Self::Service {
            service,
            chunk_size: 0,
        }
    }

    /// Selects a strategy by name (`"pattern"` or `"service"`)
    ///
    /// # Errors
    ///
    /// `Configuration` for `"service"` without a live handle, or for an
    /// unknown name. Never falls back to the pattern strategy.
    pub fn from_name(
        name: &str,
        service: Option<&'a dyn TextService>,
        chunk_size: usize,
    ) -> Result<Self, GleanError> {
        match name {
            "pattern" => Ok(Self::Pattern),
            "service" | "llm" => {
                let service = service.ok_or_else(|| {
                    GleanError::Configuration(
                        "service extraction requested but no text service is available".to_string(),
                    )
                })?;
                Ok(Self::Service {
                    service,
                    chunk_size,
                })
            }
            other => Err(GleanError::Configuration(format!(
                "unknown extraction method '{}'",
                other
            ))),
        }
    }

    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pattern => "pattern",
            Self::Service { .. } => "service",
        }
    }

    /// Extracts contact details from already normalized text
    pub async fn extract(&self, text: &str) -> Result<ContactDetails, GleanError> {
        match self {
            Self::Pattern => Ok(pattern::extract_contacts(text)),
            Self::Service {
                service,
                chunk_size,
            } => extract_with_service(*service, text, *chunk_size).await,
        }
    }
}

impl std::fmt::Debug for ExtractionMethod<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pattern => f.write_str("Pattern"),
            Self::Service { chunk_size, .. } => f
                .debug_struct("Service")
                .field("chunk_size", chunk_size)
                .finish_non_exhaustive(),
        }
    }
}

/// Extracts contact details from a document
///
/// # Example
///
/// ```
/// use sumi_glean::document::parse_document;
/// use sumi_glean::extract::{extract, ExtractionMethod};
///
/// # tokio_test_block(async {
/// let doc = parse_document("<p>Mail a@x.com or b@x.com, a@x.com</p>", "https://x.com/");
/// let details = extract(&doc, ExtractionMethod::Pattern).await.unwrap();
/// assert_eq!(details.emails, vec!["a@x.com", "b@x.com"]);
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Runtime::new().unwrap().block_on(f)
/// # }
/// ```
pub async fn extract(
    document: &Document,
    method: ExtractionMethod<'_>,
) -> Result<ContactDetails, GleanError> {
    let text = gather_text(document);
    tracing::debug!(
        "Extracting from {} ({} chars) with {} strategy",
        document.url(),
        text.len(),
        method.name()
    );
    method.extract(&text).await
}

/// Applies caller-supplied patterns to a document's content text
///
/// Patterns match case-insensitively; each field is deduplicated in order.
///
/// # Errors
///
/// `InvalidPattern` if any pattern fails to compile.
pub fn extract_custom<I, K, V>(
    document: &Document,
    patterns: I,
) -> Result<BTreeMap<String, Vec<String>>, GleanError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let compiled = compile_patterns(patterns)?;
    Ok(apply_patterns(&gather_text(document), &compiled))
}

/// Produces an outreach-oriented Markdown summary of `text`
pub async fn summarize(service: &dyn TextService, text: &str) -> Result<String, GleanError> {
    service.complete(SUMMARY_INSTRUCTION, text, None).await
}
