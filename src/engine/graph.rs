// SPDX-License-Identifier: MIT

//! Workflow graph definition types
//!
//! This module contains the data structures for workflow graphs as they
//! arrive from the editor/persistence layer: nodes with a type tag and a
//! type-specific `data` bag, and directed edges ("target depends on
//! source"). Per-kind configuration structs are parsed out of the `data`
//! bag when a node is executed, not when the graph is loaded.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use super::error::NodeError;

/// The closed set of node types the interpreter knows how to execute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    Prompt,
    AiModel,
    DataTransform,
    Condition,
    Loop,
    Input,
    Output,
    ApiCall,
    /// Forward-compatibility fallback for type tags added after this build.
    /// Executing such a node is a typed error, not a crash.
    #[serde(other)]
    Unknown,
}

impl NodeKind {
    /// Wire name of the kind (matches the serialized type tag)
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Prompt => "prompt",
            NodeKind::AiModel => "ai-model",
            NodeKind::DataTransform => "data-transform",
            NodeKind::Condition => "condition",
            NodeKind::Loop => "loop",
            NodeKind::Input => "input",
            NodeKind::Output => "output",
            NodeKind::ApiCall => "api-call",
            NodeKind::Unknown => "unknown",
        }
    }
}

/// Editor layout hint carried on every node; irrelevant to execution
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq)]
pub struct Position {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

/// One step in a workflow graph
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkflowNode {
    /// Unique within a workflow
    pub id: String,
    /// Type tag selecting the execution semantics
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Type-specific configuration bag
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub position: Position,
}

impl WorkflowNode {
    /// Parse the node's `data` bag into a typed per-kind configuration
    pub fn config<T: serde::de::DeserializeOwned>(&self) -> Result<T, NodeError> {
        serde_json::from_value(self.data.clone())
            .map_err(|e| NodeError::config(self.kind.as_str(), e.to_string()))
    }
}

/// A directed dependency declaration; target depends on source
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkflowEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

/// A complete workflow graph, read-only during a run
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WorkflowGraph {
    #[serde(default)]
    pub nodes: Vec<WorkflowNode>,
    #[serde(default)]
    pub edges: Vec<WorkflowEdge>,
}

impl WorkflowGraph {
    /// Look up a node by id
    pub fn node(&self, id: &str) -> Option<&WorkflowNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// `input` node configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub default_value: Option<Value>,
}

/// `output` node configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Value,
}

/// `prompt` node configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromptConfig {
    #[serde(default)]
    pub template: String,
    /// Variable name -> expression resolved against context before substitution
    #[serde(default)]
    pub variables: HashMap<String, Value>,
}

/// `ai-model` node configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfig {
    pub provider: String,
    pub model: String,
    #[serde(default)]
    pub prompt: Value,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

/// `data-transform` node configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TransformConfig {
    pub operation: TransformOp,
    #[serde(default)]
    pub input: Value,
    #[serde(default)]
    pub parameters: TransformParams,
}

/// The fixed set of transform operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransformOp {
    JsonParse,
    JsonStringify,
    TextSplit,
    TextJoin,
    TextReplace,
    ExtractField,
    /// Unrecognized operations pass the input through unchanged
    #[serde(other)]
    Other,
}

/// Optional parameters shared by the transform operations
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransformParams {
    #[serde(default)]
    pub delimiter: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub replace: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
}

/// `condition` node configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ConditionConfig {
    #[serde(default)]
    pub left: Value,
    #[serde(default)]
    pub right: Value,
    pub operator: ConditionOp,
}

/// Comparison operators for condition nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConditionOp {
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    Contains,
    StartsWith,
    EndsWith,
    /// Unrecognized operators evaluate to false
    #[serde(other)]
    Unknown,
}

/// `loop` node configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoopConfig {
    #[serde(rename = "type")]
    pub kind: LoopKind,
    #[serde(default)]
    pub items: Value,
    /// Loop body nodes. Accepted but not sub-executed; see the interpreter.
    #[serde(default)]
    pub body: Value,
}

/// Loop strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoopKind {
    ForEach,
    #[serde(other)]
    Other,
}

/// `api-call` node configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiCallConfig {
    #[serde(default)]
    pub url: Value,
    #[serde(default)]
    pub method: Option<String>,
    /// Header name -> expression resolved against context
    #[serde(default)]
    pub headers: HashMap<String, Value>,
    #[serde(default)]
    pub body: Option<Value>,
}
