// SPDX-License-Identifier: MIT

//! OpenAI provider - chat completions API

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::env;

use super::{GenerateRequest, TextGenerator};
use crate::engine::error::ProviderError;

/// OpenAI text-generation client
pub struct OpenAiGenerator {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiGenerator {
    /// Create a client from the environment.
    ///
    /// Requires `OPENAI_API_KEY`. Optionally uses `OPENAI_BASE_URL` for
    /// custom endpoints.
    pub fn from_env() -> Result<Self, ProviderError> {
        let api_key = env::var("OPENAI_API_KEY")
            .map_err(|_| ProviderError::ApiKeyMissing("openai".to_string()))?;
        let base_url =
            env::var("OPENAI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".to_string());

        Ok(Self {
            client: Client::new(),
            api_key,
            base_url,
        })
    }

    /// Extract the generated text from a chat completions response
    fn parse_response(response: &serde_json::Value) -> Result<String, ProviderError> {
        response["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ProviderError::api("openai", "no message content in response"))
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn generate(&self, request: &GenerateRequest) -> Result<String, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);

        let body = json!({
            "model": request.model,
            "messages": [{ "role": "user", "content": request.prompt }],
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
        });

        log::debug!("openai request model={}", request.model);

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(ProviderError::api("openai", text));
        }

        let resp_json: serde_json::Value = resp.json().await?;
        Self::parse_response(&resp_json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_response() {
        let response = json!({
            "choices": [{
                "message": { "role": "assistant", "content": "Hello there" },
                "finish_reason": "stop"
            }]
        });

        assert_eq!(
            OpenAiGenerator::parse_response(&response).unwrap(),
            "Hello there"
        );
    }

    #[test]
    fn test_parse_response_without_content_fails() {
        let response = json!({ "choices": [] });
        assert!(OpenAiGenerator::parse_response(&response).is_err());
    }
}
