//! Service extraction strategy
//!
//! The reply is expected to hold a JSON object with the keys `emails`,
//! `phone_numbers`, `addresses` and `social_media`. Replies that do not parse
//! yield empty fields instead of an error, and missing keys default to empty.

use crate::extract::pattern::dedup_in_order;
use crate::extract::ContactDetails;
use crate::llm::{stream_chunks, TextService, EXTRACTION_INSTRUCTION};
use crate::GleanError;
use serde_json::{Map, Value};
use std::num::NonZeroUsize;

/// Extracts contact details by asking `service`
///
/// With a non-zero `chunk_size` and text longer than that many characters,
/// one request is sent per chunk and the replies are merged in chunk order.
///
/// # Errors
///
/// Only transport-level `Service` errors from the service itself; malformed
/// replies never fail.
pub async fn extract_with_service(
    service: &dyn TextService,
    text: &str,
    chunk_size: usize,
) -> Result<ContactDetails, GleanError> {
    let chunk_size = match NonZeroUsize::new(chunk_size) {
        Some(size) if text.chars().count() > size.get() => size,
        _ => {
            let reply = service.complete(EXTRACTION_INSTRUCTION, text, None).await?;
            return Ok(parse_service_response(&reply));
        }
    };

    let mut details = ContactDetails::default();
    for (index, chunk) in stream_chunks(text, chunk_size).enumerate() {
        tracing::debug!("Sending chunk {} ({} chars) to text service", index, chunk.chars().count());
        let reply = service.complete(EXTRACTION_INSTRUCTION, chunk, None).await?;
        details.merge(parse_service_response(&reply));
    }
    Ok(details)
}

/// Converts a raw service reply into contact details
///
/// Accepts a bare JSON object, one wrapped in a Markdown code fence, or one
/// embedded in surrounding prose. Anything else gives empty details.
///
/// # Example
///
/// ```
/// use sumi_glean::extract::parse_service_response;
///
/// let details = parse_service_response(r#"{"emails": ["a@x.com", "a@x.com"]}"#);
/// assert_eq!(details.emails, vec!["a@x.com"]);
/// assert!(details.phone_numbers.is_empty());
///
/// assert!(parse_service_response("Sorry, I can't help with that.").is_empty());
/// ```
pub fn parse_service_response(raw: &str) -> ContactDetails {
    let object = match json_object(raw) {
        Some(object) => object,
        None => {
            tracing::warn!(
                "Text service reply is not a JSON object, treating as empty ({} chars)",
                raw.len()
            );
            return ContactDetails::default();
        }
    };

    ContactDetails {
        emails: string_list(&object, "emails"),
        phone_numbers: string_list(&object, "phone_numbers"),
        addresses: string_list(&object, "addresses"),
        social_media: string_list(&object, "social_media"),
    }
}

fn json_object(raw: &str) -> Option<Map<String, Value>> {
    let trimmed = strip_code_fence(raw.trim());

    if let Ok(Value::Object(object)) = serde_json::from_str::<Value>(trimmed) {
        return Some(object);
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str::<Value>(&trimmed[start..=end]) {
        Ok(Value::Object(object)) => Some(object),
        _ => None,
    }
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string ("json") on the opening fence line
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().trim_end_matches("```").trim()
}

fn string_list(object: &Map<String, Value>, key: &str) -> Vec<String> {
    match object.get(key) {
        Some(Value::Array(items)) => dedup_in_order(
            items
                .iter()
                .filter_map(Value::as_str)
                .map(|s| s.trim().to_string()),
        ),
        Some(Value::String(s)) => dedup_in_order(std::iter::once(s.trim().to_string())),
        _ => Vec::new(),
    }
}
