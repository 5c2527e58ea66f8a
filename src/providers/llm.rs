//! LLM provider trait

use async_trait::async_trait;

use crate::error::Result;

/// Trait for language-model answer generation
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a completion for a fully assembled prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// The model being used
    fn model(&self) -> &str;

    /// Provider name for logging
    fn name(&self) -> &str;
}
