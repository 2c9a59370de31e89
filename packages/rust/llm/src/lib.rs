//! Client for OpenAI-compatible chat completion and moderation endpoints.
//!
//! The assistant talks to the model service through [`ModelService`], so the
//! HTTP client can be swapped for an in-process fake in tests.

mod client;

use std::future::Future;

use novainfor_shared::{ConversationMessage, Result};

pub use client::{ClientSettings, OpenAiClient};

/// The two remote operations the assistant needs.
pub trait ModelService: Send + Sync {
    /// Generate a reply for the full transcript.
    fn complete(
        &self,
        messages: &[ConversationMessage],
    ) -> impl Future<Output = Result<String>> + Send;

    /// Returns `true` if the text is disallowed.
    fn is_flagged(&self, text: &str) -> impl Future<Output = Result<bool>> + Send;
}
