// SPDX-License-Identifier: MIT

//! Run-scoped execution context and value resolution
//!
//! The context is a single key/value map threading node outputs to
//! downstream consumers: seeded from the caller's input payload, then each
//! executed node's result is written under the node's id. It lives for one
//! run and is mutated only by the sequential run loop, so plain owned
//! storage suffices.
//!
//! Value resolution is a single-token substitution, not a templating
//! language: a string of the exact form `{{key}}` resolves to the context
//! value under `key`, and anything else (including `{{key}}` embedded in a
//! larger string) passes through untouched. The richer every-occurrence
//! substitution exists only for prompt templates via [`render_template`].

use serde_json::Value;
use std::collections::HashMap;

/// The run-scoped key/value store
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    values: HashMap<String, Value>,
}

impl ExecutionContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context seeded from the caller-supplied input payload.
    ///
    /// Object payloads are merged at top level; any other payload seeds an
    /// empty context.
    pub fn from_input(input: &Value) -> Self {
        let mut context = Self::new();
        if let Value::Object(map) = input {
            for (key, value) in map {
                context.values.insert(key.clone(), value.clone());
            }
        }
        context
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Write a value, overwriting any previous entry for the key
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    /// Resolve a value against the context.
    ///
    /// A string of the exact form `{{key}}` is replaced by the context
    /// value under `key`; a missing key yields the literal token unchanged.
    /// Every other value resolves to itself.
    pub fn resolve(&self, value: &Value) -> Value {
        if let Value::String(s) = value {
            if let Some(key) = s.strip_prefix("{{").and_then(|rest| rest.strip_suffix("}}")) {
                return self.get(key).cloned().unwrap_or_else(|| value.clone());
            }
        }
        value.clone()
    }

    /// Substitute prompt-template variables.
    ///
    /// Each variable expression is resolved against the context, then every
    /// occurrence of `{{name}}` in the template is replaced with the
    /// stringified result. Substitution is best-effort: template tokens with
    /// no matching variable stay as-is.
    pub fn render_template(&self, template: &str, variables: &HashMap<String, Value>) -> String {
        let mut rendered = template.to_string();
        for (name, expression) in variables {
            let resolved = self.resolve(expression);
            let token = format!("{{{{{name}}}}}");
            rendered = rendered.replace(&token, &value_to_string(&resolved));
        }
        rendered
    }
}

/// Render a value as display text: strings pass through unquoted, every
/// other value renders as its JSON text.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
