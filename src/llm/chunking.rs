//! Splitting long text into model-sized pieces
//!
//! Sizes count `char`s, and cuts always land on char boundaries.

use crate::GleanError;
use std::num::NonZeroUsize;

/// Splits `text` into pieces of at most `size` characters
///
/// # Errors
///
/// `Configuration` if `size` is zero.
///
/// # Example
///
/// ```
/// use sumi_glean::llm::chunk_text;
///
/// assert_eq!(chunk_text("abcdefg", 3).unwrap(), vec!["abc", "def", "g"]);
/// ```
pub fn chunk_text(text: &str, size: usize) -> Result<Vec<String>, GleanError> {
    let size = NonZeroUsize::new(size)
        .ok_or_else(|| GleanError::Configuration("chunk size must be positive".to_string()))?;
    Ok(stream_chunks(text, size).map(str::to_string).collect())
}

/// Lazily yields successive pieces of at most `size` characters
pub fn stream_chunks(text: &str, size: NonZeroUsize) -> impl Iterator<Item = &str> + '_ {
    let size = size.get();
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let cut = rest
            .char_indices()
            .nth(size)
            .map(|(idx, _)| idx)
            .unwrap_or(rest.len());
        let (head, tail) = rest.split_at(cut);
        rest = tail;
        Some(head)
    })
}
