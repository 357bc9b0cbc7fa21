//! Language model integration
//!
//! This module contains:
//! - The `TextService` seam the extraction engine talks to
//! - An OpenRouter-compatible chat-completions client implementing it
//! - The fixed extraction and summary instructions
//! - Text chunking for long pages

mod chunking;
mod client;
mod prompt;

pub use chunking::{chunk_text, stream_chunks};
pub use client::LlmService;
pub use prompt::{build_prompt, EXTRACTION_INSTRUCTION, SUMMARY_INSTRUCTION};

use crate::GleanError;
use async_trait::async_trait;

/// External text-understanding service
///
/// Request: an instruction, the page text, and an optional model override.
/// Response: the raw reply text. Connection pooling, retries and rate
/// limiting are the implementation's concern.
#[async_trait]
pub trait TextService: Send + Sync {
    /// Applies `instruction` to `text` and returns the model's reply
    async fn complete(
        &self,
        instruction: &str,
        text: &str,
        model: Option<&str>,
    ) -> Result<String, GleanError>;
}
