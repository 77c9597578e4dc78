// SPDX-License-Identifier: MIT

//! Workflow definition loading
//!
//! Loads workflow definitions from YAML or JSON files and promotes them to
//! `WorkflowRecord`s ready for registration and execution.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use uuid::Uuid;

use super::error::FlowError;
use super::graph::{WorkflowEdge, WorkflowNode};
use super::record::WorkflowRecord;

/// On-disk workflow definition: metadata plus a flat graph
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub nodes: Vec<WorkflowNode>,
    #[serde(default)]
    pub edges: Vec<WorkflowEdge>,
}

impl WorkflowDefinition {
    /// Promote the definition to a workflow record with a fresh id
    pub fn into_record(self) -> WorkflowRecord {
        WorkflowRecord {
            id: Uuid::new_v4().to_string(),
            name: self.name,
            description: self.description,
            workflow_data: super::graph::WorkflowGraph {
                nodes: self.nodes,
                edges: self.edges,
            },
            execution_count: 0,
            last_executed: None,
        }
    }
}

/// Loads workflow definitions from files
pub struct WorkflowLoader;

impl WorkflowLoader {
    /// Load a definition from a YAML (`.yaml`/`.yml`) or JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<WorkflowDefinition, FlowError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::parse_json(&content),
            _ => Self::parse_yaml(&content),
        }
    }

    /// Parse a definition from a YAML string
    pub fn parse_yaml(content: &str) -> Result<WorkflowDefinition, FlowError> {
        let def: WorkflowDefinition = serde_yaml::from_str(content)?;
        Ok(def)
    }

    /// Parse a definition from a JSON string
    pub fn parse_json(content: &str) -> Result<WorkflowDefinition, FlowError> {
        let def: WorkflowDefinition = serde_json::from_str(content)?;
        Ok(def)
    }
}
