// SPDX-License-Identifier: MIT

//! Typed error handling for the workflow engine
//!
//! This module provides the error hierarchy using thiserror. Node-level
//! failures (`NodeError`) abort a run and end up as the execution record's
//! `error_message`; only store/infrastructure failures escape the run
//! function itself as `FlowError`.

use thiserror::Error;

/// Top-level error type for the engine
#[derive(Debug, Error)]
pub enum FlowError {
    /// Persistence failures while updating the execution record
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Invalid workflow definition (bad file, bad structure)
    #[error("Workflow definition error: {0}")]
    Definition(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

/// Per-node execution errors
#[derive(Debug, Error)]
pub enum NodeError {
    /// A node carried a type tag the interpreter has no handler for
    #[error("Unknown node type: {0}")]
    UnknownKind(String),

    /// The node's `data` bag did not match the expected configuration shape
    #[error("Invalid {kind} node configuration: {message}")]
    Config { kind: &'static str, message: String },

    /// Malformed data fed to an operation (bad JSON, non-array for-each, ...)
    #[error("{0}")]
    Malformed(String),

    /// Non-success HTTP status from an api-call node
    #[error("API call failed: {status} {status_text}")]
    HttpStatus { status: u16, status_text: String },

    /// Transport-level HTTP failure from an api-call node
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Text-generation capability failure
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl NodeError {
    /// Create a config error
    pub fn config(kind: &'static str, message: impl Into<String>) -> Self {
        Self::Config {
            kind,
            message: message.into(),
        }
    }

    /// Create a malformed-data error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }
}

/// Text-generation provider errors
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Provider identifier not present in the registry
    #[error("Unsupported AI provider: {0}")]
    Unsupported(String),

    /// API key not configured
    #[error("API key not configured for provider: {0}")]
    ApiKeyMissing(String),

    /// API error from the provider
    #[error("{provider} API error: {message}")]
    Api { provider: String, message: String },

    /// Transport-level HTTP failure
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl ProviderError {
    /// Create an API error
    pub fn api(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            provider: provider.into(),
            message: message.into(),
        }
    }
}

/// Persistence handle errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Execution record not found
    #[error("Execution not found: {0}")]
    ExecutionNotFound(String),

    /// Workflow record not found
    #[error("Workflow not found: {0}")]
    WorkflowNotFound(String),
}
