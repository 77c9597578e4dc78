// SPDX-License-Identifier: MIT

//! Google provider - Gemini generateContent API

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::env;

use super::{GenerateRequest, TextGenerator};
use crate::engine::error::ProviderError;

/// Google Gemini text-generation client
pub struct GoogleGenerator {
    client: Client,
    api_key: String,
}

impl GoogleGenerator {
    /// Create a client from the environment.
    ///
    /// Requires `GOOGLE_API_KEY`.
    pub fn from_env() -> Result<Self, ProviderError> {
        let api_key = env::var("GOOGLE_API_KEY")
            .map_err(|_| ProviderError::ApiKeyMissing("google".to_string()))?;
        Ok(Self {
            client: Client::new(),
            api_key,
        })
    }

    /// Concatenate the text parts of the first candidate
    fn parse_response(response: &serde_json::Value) -> Result<String, ProviderError> {
        let parts = response["candidates"][0]["content"]["parts"]
            .as_array()
            .ok_or_else(|| ProviderError::api("google", "no candidates in response"))?;

        let text: String = parts
            .iter()
            .filter_map(|part| part["text"].as_str())
            .collect();

        if text.is_empty() {
            return Err(ProviderError::api("google", "no text parts in response"));
        }
        Ok(text)
    }
}

#[async_trait]
impl TextGenerator for GoogleGenerator {
    async fn generate(&self, request: &GenerateRequest) -> Result<String, ProviderError> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            request.model, self.api_key
        );

        let body = json!({
            "contents": [{ "parts": [{ "text": request.prompt }] }],
            "generationConfig": {
                "temperature": request.temperature,
                "maxOutputTokens": request.max_tokens,
            },
        });

        log::debug!("google request model={}", request.model);

        let resp = self.client.post(&url).json(&body).send().await?;

        if !resp.status().is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(ProviderError::api("google", text));
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
            "candidates": [{
                "content": { "parts": [{ "text": "Generated text" }], "role": "model" },
                "finishReason": "STOP"
            }]
        });

        assert_eq!(
            GoogleGenerator::parse_response(&response).unwrap(),
            "Generated text"
        );
    }

    #[test]
    fn test_parse_joins_parts() {
        let response = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "a" }, { "text": "b" }] }
            }]
        });

        assert_eq!(GoogleGenerator::parse_response(&response).unwrap(), "ab");
    }

    #[test]
    fn test_parse_without_candidates_fails() {
        let response = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        assert!(GoogleGenerator::parse_response(&response).is_err());
    }
}
