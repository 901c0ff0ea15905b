// engine/llm/gemini.rs — Google Gemini provider (primary)

use super::ProviderClient;
use crate::engine::types::ProviderResult;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const MODEL: &str = "gemini-1.5-flash";

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: String,
}

pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(20))
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
impl ProviderClient for GeminiClient {
    async fn complete(&self, prompt: &str, max_tokens: u32, temperature: f32) -> ProviderResult {
        let Some(api_key) = self.api_key.as_deref() else {
            return ProviderResult::Unavailable {
                reason: format!("{} not set", API_KEY_VAR),
            };
        };

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, MODEL, api_key
        );

        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature,
                max_output_tokens: max_tokens,
            },
        };

        let response = match self.client.post(&url).json(&request).send().await {
            Ok(response) => response,
            Err(e) => {
                return ProviderResult::Error {
                    message: format!("Gemini: {}", e),
                }
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return ProviderResult::Error {
                message: format!("Gemini {}: {}", status, body),
            };
        }

        let gemini: GeminiResponse = match response.json().await {
            Ok(parsed) => parsed,
            Err(e) => {
                return ProviderResult::Error {
                    message: format!("Gemini parse: {}", e),
                }
            }
        };

        match gemini
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
        {
            Some(part) if !part.text.trim().is_empty() => ProviderResult::Success {
                text: part.text.clone(),
            },
            _ => ProviderResult::Error {
                message: "Gemini: empty response".to_string(),
            },
        }
    }

    fn name(&self) -> &str {
        "gemini"
    }
}
