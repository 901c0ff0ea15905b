// engine/llm/openai.rs — OpenAI chat-completions provider (secondary)

use super::ProviderClient;
use crate::engine::types::ProviderResult;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const BASE_URL: &str = "https://api.openai.com/v1";
const MODEL: &str = "gpt-4o-mini";

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

pub struct OpenAiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key,
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn from_env() -> Self {
        let key = std::env::var(API_KEY_VAR)
            .ok()
            .filter(|k| !k.trim().is_empty());
        Self::new(key)
    }

    #[cfg(test)]
    fn with_base_url(api_key: Option<String>, base_url: String) -> Self {
        let mut adapter = Self::new(api_key);
        adapter.base_url = base_url;
        adapter
    }
}

#[async_trait]
impl ProviderClient for OpenAiClient {
    async fn complete(&self, prompt: &str, max_tokens: u32, temperature: f32) -> ProviderResult {
        let Some(api_key) = self.api_key.as_deref() else {
            return ProviderResult::Unavailable {
                reason: format!("{} not set", API_KEY_VAR),
            };
        };

        let request = ChatRequest {
            model: MODEL.to_string(),
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            max_tokens,
            temperature,
        };

        let url = format!("{}/chat/completions", self.base_url);

        let response = match self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                return ProviderResult::Error {
                    message: format!("OpenAI: {}", e),
                }
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return ProviderResult::Error {
                message: format!("OpenAI {}: {}", status, body),
            };
        }

        let chat: ChatResponse = match response.json().await {
            Ok(parsed) => parsed,
            Err(e) => {
                return ProviderResult::Error {
                    message: format!("OpenAI parse: {}", e),
                }
            }
        };

        match chat.choices.first() {
            Some(choice) if !choice.message.content.trim().is_empty() => {
                ProviderResult::Success {
                    text: choice.message.content.clone(),
                }
            }
            _ => ProviderResult::Error {
                message: "OpenAI: empty response".to_string(),
            },
        }
    }

    fn name(&self) -> &str {
        "openai"
    }
}
