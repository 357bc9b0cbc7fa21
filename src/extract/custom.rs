//! Caller-supplied pattern extraction

use crate::extract::pattern::dedup_in_order;
use crate::GleanError;
use regex::{Regex, RegexBuilder};
use std::collections::BTreeMap;

/// Compiles named patterns case-insensitively
///
/// # Errors
///
/// `InvalidPattern` naming the first pattern that fails to compile.
pub fn compile_patterns<I, K, V>(patterns: I) -> Result<Vec<(String, Regex)>, GleanError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    patterns
        .into_iter()
        .map(|(name, pattern)| {
            let name = name.as_ref().to_string();
            let regex = RegexBuilder::new(pattern.as_ref())
                .case_insensitive(true)
                .build()
                .map_err(|source| GleanError::InvalidPattern {
                    name: name.clone(),
                    source,
                })?;
            Ok((name, regex))
        })
        .collect()
}

/// Applies each compiled pattern to `text`
///
/// A pattern with exactly one capture group yields that group; any other
/// pattern yields the whole match. Matches are deduplicated per field in
/// order of first occurrence.
pub fn apply_patterns(text: &str, patterns: &[(String, Regex)]) -> BTreeMap<String, Vec<String>> {
    patterns
        .iter()
        .map(|(name, regex)| {
            let single_group = regex.captures_len() == 2;
            let matches = regex.captures_iter(text).filter_map(|caps| {
                let m = if single_group { caps.get(1) } else { caps.get(0) };
                m.map(|m| m.as_str().to_string())
            });
            (name.clone(), dedup_in_order(matches))
        })
        .collect()
}
