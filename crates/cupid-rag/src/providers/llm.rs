//! LLM provider trait for chat-style generation

use async_trait::async_trait;
use crate::config::DecodingParams;
use crate::error::Result;

/// Trait for chat-style text generation
///
/// Slot extraction and answer synthesis share one provider and differ only in
/// the system persona and the [`DecodingParams`] profile passed per call.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a completion for a system persona and a user prompt
    async fn complete(&self, system: &str, prompt: &str, params: &DecodingParams) -> Result<String>;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
