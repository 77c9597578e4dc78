// SPDX-License-Identifier: MIT

//! Text-generation capability
//!
//! This module defines the `TextGenerator` trait the `ai-model` node
//! delegates to, plus a registry keyed by provider identifier. Provider
//! implementations are in their own submodules:
//! - [anthropic] - Anthropic's Claude API
//! - [google] - Google's Gemini API
//! - [openai] - OpenAI's chat completions API

pub mod anthropic;
pub mod google;
pub mod openai;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::engine::error::ProviderError;

pub use anthropic::AnthropicGenerator;
pub use google::GoogleGenerator;
pub use openai::OpenAiGenerator;

/// A single text-generation request
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Core trait for text-generation provider implementations
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for a resolved prompt with sampling parameters
    async fn generate(&self, request: &GenerateRequest) -> Result<String, ProviderError>;
}

/// Capability lookup keyed by provider identifier
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn TextGenerator>>,
}

impl ProviderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the built-in providers whose API keys are configured.
    ///
    /// A provider with no configured key is skipped with a warning; looking
    /// it up later yields the unsupported-provider error.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();

        match OpenAiGenerator::from_env() {
            Ok(generator) => registry.register("openai", Arc::new(generator)),
            Err(e) => log::warn!("openai provider unavailable: {}", e),
        }
        match AnthropicGenerator::from_env() {
            Ok(generator) => registry.register("anthropic", Arc::new(generator)),
            Err(e) => log::warn!("anthropic provider unavailable: {}", e),
        }
        match GoogleGenerator::from_env() {
            Ok(generator) => registry.register("google", Arc::new(generator)),
            Err(e) => log::warn!("google provider unavailable: {}", e),
        }

        registry
    }

    /// Register a generator under a provider identifier
    pub fn register(&mut self, name: impl Into<String>, generator: Arc<dyn TextGenerator>) {
        self.providers.insert(name.into(), generator);
    }

    /// Look up a generator by provider identifier
    pub fn get(&self, name: &str) -> Result<Arc<dyn TextGenerator>, ProviderError> {
        self.providers
            .get(name)
            .cloned()
            .ok_or_else(|| ProviderError::Unsupported(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoGenerator;

    #[async_trait]
    impl TextGenerator for EchoGenerator {
        async fn generate(&self, request: &GenerateRequest) -> Result<String, ProviderError> {
            Ok(format!("echo: {}", request.prompt))
        }
    }

    #[tokio::test]
    async fn test_register_and_get() {
        let mut registry = ProviderRegistry::new();
        registry.register("echo", Arc::new(EchoGenerator));

        let generator = registry.get("echo").unwrap();
        let text = generator
            .generate(&GenerateRequest {
                model: "test".to_string(),
                prompt: "hello".to_string(),
                temperature: 0.7,
                max_tokens: 100,
            })
            .await
            .unwrap();
        assert_eq!(text, "echo: hello");
    }

    #[test]
    fn test_unknown_provider_is_unsupported() {
        let registry = ProviderRegistry::new();
        let result = registry.get("mistral");
        assert!(matches!(result, Err(ProviderError::Unsupported(name)) if name == "mistral"));
    }

    #[test]
    fn test_register_overwrites_existing() {
        let mut registry = ProviderRegistry::new();
        registry.register("echo", Arc::new(EchoGenerator));
        registry.register("echo", Arc::new(EchoGenerator));
        assert!(registry.get("echo").is_ok());
    }
}
