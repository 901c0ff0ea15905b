// engine/llm/mock.rs — Scripted provider for orchestrator and pipeline tests

use super::ProviderClient;
use crate::engine::types::ProviderResult;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Returns its scripted results in order, repeating the last one once the
/// script runs dry. Records every prompt and counts invocations so tests can
/// assert a provider was (or was not) called.
pub struct MockProvider {
    name: String,
    script: Mutex<Vec<ProviderResult>>,
    calls: Arc<AtomicUsize>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    pub fn new(name: &str, script: Vec<ProviderResult>) -> Self {
        Self {
            name: name.to_string(),
            script: Mutex::new(script),
            calls: Arc::new(AtomicUsize::new(0)),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn succeeding(name: &str, text: &str) -> Self {
        Self::new(
            name,
            vec![ProviderResult::Success {
                text: text.to_string(),
            }],
        )
    }

    /// Shared counter handle; grab it before boxing the provider.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }

    /// Shared prompt log handle; grab it before boxing the provider.
    pub fn prompt_log(&self) -> Arc<Mutex<Vec<String>>> {
        self.prompts.clone()
    }
}

#[async_trait]
impl ProviderClient for MockProvider {
    async fn complete(&self, prompt: &str, _max_tokens: u32, _temperature: f32) -> ProviderResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());

        let mut script = self.script.lock().unwrap();
        if script.len() > 1 {
            script.remove(0)
        } else {
            script.first().cloned().unwrap_or(ProviderResult::Error {
                message: "script exhausted".to_string(),
            })
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
