use super::ProviderConfig;
use crate::engine::llm::{GeminiClient, OpenAiClient};

/// Both providers are always registered; a missing credential surfaces as
/// `Unavailable` from the client itself, so the fallback chain can name it
/// in the diagnostic instead of silently shrinking.
pub fn default_providers_from_env() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig {
            id: "gemini".to_string(),
            priority: 1,
            client: Box::new(GeminiClient::from_env()),
            max_retries: 1,
            timeout_secs: 20,
        },
        ProviderConfig {
            id: "openai".to_string(),
            priority: 2,
            client: Box::new(OpenAiClient::from_env()),
            max_retries: 1,
            timeout_secs: 15,
        },
    ]
}
