// SPDX-License-Identifier: MIT

//! Anthropic provider - Claude messages API

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::env;

use super::{GenerateRequest, TextGenerator};
use crate::engine::error::ProviderError;

/// Anthropic text-generation client
pub struct AnthropicGenerator {
    client: Client,
    api_key: String,
    base_url: String,
}

impl AnthropicGenerator {
    /// Create a client from the environment.
    ///
    /// Requires `ANTHROPIC_API_KEY`. Optionally uses `ANTHROPIC_BASE_URL`
    /// for custom endpoints.
    pub fn from_env() -> Result<Self, ProviderError> {
        let api_key = env::var("ANTHROPIC_API_KEY")
            .map_err(|_| ProviderError::ApiKeyMissing("anthropic".to_string()))?;
        let base_url = env::var("ANTHROPIC_BASE_URL")
            .unwrap_or_else(|_| "https://api.anthropic.com/v1".to_string());

        Ok(Self {
            client: Client::new(),
            api_key,
            base_url,
        })
    }

    /// Concatenate the text blocks of a messages response
    fn parse_response(response: &serde_json::Value) -> Result<String, ProviderError> {
        let blocks = response["content"]
            .as_array()
            .ok_or_else(|| ProviderError::api("anthropic", "no content in response"))?;

        let text: String = blocks
            .iter()
            .filter(|block| block["type"] == "text")
            .filter_map(|block| block["text"].as_str())
            .collect();

        if text.is_empty() {
            return Err(ProviderError::api("anthropic", "no text blocks in response"));
        }
        Ok(text)
    }
}

#[async_trait]
impl TextGenerator for AnthropicGenerator {
    async fn generate(&self, request: &GenerateRequest) -> Result<String, ProviderError> {
        let url = format!("{}/messages", self.base_url);

        let body = json!({
            "model": request.model,
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
            "messages": [{ "role": "user", "content": request.prompt }],
        });

        log::debug!("anthropic request model={}", request.model);

        let resp = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(ProviderError::api("anthropic", text));
        }

        let resp_json: serde_json::Value = resp.json().await?;
        Self::parse_response(&resp_json)
    }
}
