// engine/llm/mod.rs — Provider trait over the configured LLM backends

pub mod gemini;
pub mod openai;

#[cfg(test)]
pub(crate) mod mock;

pub use gemini::GeminiClient;
pub use openai::OpenAiClient;

use crate::engine::types::ProviderResult;
use async_trait::async_trait;

/// Trait for LLM completion providers.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// One completion call at most. Every transport, auth or quota failure
    /// is normalized into the returned variant; a missing credential is
    /// reported as `Unavailable` without touching the network. This never
    /// panics and never returns a Rust error.
    async fn complete(&self, prompt: &str, max_tokens: u32, temperature: f32) -> ProviderResult;

    /// Provider id used in logs, metrics and fallback diagnostics.
    fn name(&self) -> &str;
}
