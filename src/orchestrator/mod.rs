// orchestrator/mod.rs — Sequential fallback across configured providers

use crate::engine::llm::ProviderClient;
use crate::engine::template;
use crate::engine::types::{Completion, OptimizationRequest, ProviderResult};
use std::sync::Mutex;
use std::time::Duration;

use self::metrics::Metrics;
use self::provider_registry::default_providers_from_env;
use self::retry::RetryPolicy;

pub mod metrics;
pub mod provider_registry;
pub mod retry;

pub struct ProviderConfig {
    pub id: String,
    pub priority: u8,
    pub client: Box<dyn ProviderClient>,
    pub max_retries: u8,
    pub timeout_secs: u64,
}

/// Tries providers in priority order and short-circuits on the first
/// success. A fallback is triggered only by the `ProviderResult` tag, never
/// by sniffing the response text. When every provider fails, the caller
/// gets a synthesized diagnostic naming each failure — never an error.
pub struct FallbackOrchestrator {
    providers: Vec<ProviderConfig>,
    metrics: Mutex<Metrics>,
}

impl FallbackOrchestrator {
    pub fn new(mut providers: Vec<ProviderConfig>) -> Self {
        providers.sort_by_key(|p| p.priority);

        Self {
            providers,
            metrics: Mutex::new(Metrics::new()),
        }
    }

    pub fn from_env() -> Self {
        Self::new(default_providers_from_env())
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.id.as_str()).collect()
    }

    pub fn has_provider(&self, id: &str) -> bool {
        self.providers.iter().any(|p| p.id == id)
    }

    /// Snapshot of the per-provider counters.
    pub fn metrics(&self) -> Metrics {
        self.metrics.lock().map(|m| m.clone()).unwrap_or_default()
    }

    /// Build the optimization instruction for `request` and run it through
    /// the fallback chain.
    pub async fn optimize(&self, request: &OptimizationRequest, temperature: f32) -> Completion {
        let instruction = template::build(request.task(), request.style());
        self.complete(&instruction, request.max_output_tokens(), temperature)
            .await
    }

    /// Run `prompt` through every configured provider in priority order.
    pub async fn complete(&self, prompt: &str, max_tokens: u32, temperature: f32) -> Completion {
        let mut failures: Vec<(String, String)> = Vec::new();

        for provider in &self.providers {
            tracing::info!(
                "Trying provider '{}' (priority {})",
                provider.id,
                provider.priority
            );

            match self
                .try_provider(provider, prompt, max_tokens, temperature)
                .await
            {
                ProviderResult::Success { text } => {
                    tracing::info!("Provider '{}' succeeded ({} chars)", provider.id, text.len());
                    self.record_success(&provider.id);
                    return Completion {
                        text,
                        provider: Some(provider.id.clone()),
                    };
                }
                ProviderResult::Unavailable { reason } => {
                    tracing::warn!("Provider '{}' unavailable: {}", provider.id, reason);
                    self.record_failure(&provider.id);
                    failures.push((provider.id.clone(), format!("unavailable: {}", reason)));
                }
                ProviderResult::Error { message } => {
                    tracing::warn!("Provider '{}' failed: {}", provider.id, message);
                    self.record_failure(&provider.id);
                    failures.push((provider.id.clone(), format!("error: {}", message)));
                }
            }
        }

        tracing::error!("All providers failed: {:?}", failures);
        Completion {
            text: diagnostic(&failures),
            provider: None,
        }
    }

    /// Run `prompt` against one named provider only. Used for escalation and
    /// for routed subtasks with an explicit label binding. Returns `None`
    /// when no provider with that id is configured.
    pub async fn complete_via(
        &self,
        id: &str,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Option<ProviderResult> {
        let provider = self.providers.iter().find(|p| p.id == id)?;
        let result = self
            .try_provider(provider, prompt, max_tokens, temperature)
            .await;

        match &result {
            ProviderResult::Success { .. } => self.record_success(&provider.id),
            _ => self.record_failure(&provider.id),
        }

        Some(result)
    }

    async fn try_provider(
        &self,
        provider: &ProviderConfig,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> ProviderResult {
        let policy = RetryPolicy::new(provider.max_retries);
        let timeout = Duration::from_secs(provider.timeout_secs);
        let mut attempt = 0u8;

        loop {
            let call = provider.client.complete(prompt, max_tokens, temperature);
            let result = match tokio::time::timeout(timeout, call).await {
                Ok(result) => result,
                Err(_) => ProviderResult::Error {
                    message: format!(
                        "{}: timed out after {}s",
                        provider.id, provider.timeout_secs
                    ),
                },
            };

            if policy.should_retry(attempt, &result) {
                tracing::warn!(
                    "Provider '{}' attempt {}/{} failed, retrying",
                    provider.id,
                    attempt + 1,
                    provider.max_retries + 1
                );
                policy.wait_before_retry(attempt).await;
                attempt += 1;
                continue;
            }

            return result;
        }
    }

    fn record_success(&self, id: &str) {
        if let Ok(mut metrics) = self.metrics.lock() {
            metrics.record_success(id);
        }
    }

    fn record_failure(&self, id: &str) {
        if let Ok(mut metrics) = self.metrics.lock() {
            metrics.record_failure(id);
        }
    }
}

/// One line per failed provider, e.g.
/// `gemini unavailable: GEMINI_API_KEY not set`.
fn diagnostic(failures: &[(String, String)]) -> String {
    if failures.is_empty() {
        return "No providers configured".to_string();
    }

    failures
        .iter()
        .map(|(id, what)| format!("{} {}", id, what))
        .collect::<Vec<_>>()
        .join("\n")
}
