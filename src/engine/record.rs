// SPDX-License-Identifier: MIT

//! Persisted execution and workflow record shapes
//!
//! An `ExecutionRecord` is created in `pending` status by the caller and
//! driven by the executor through `running` to `completed` or `failed`.
//! Log entries are appended after every node so observers polling the
//! record see progress in near-real-time. `cancelled` exists in the status
//! vocabulary for external callers but the executor never produces it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::graph::{NodeKind, WorkflowGraph, WorkflowNode};

/// Lifecycle states of an execution record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

/// Outcome of a single node within a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Success,
    Error,
}

/// One entry in the append-only per-node execution log
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionLogEntry {
    pub node_id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub status: StepStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub duration_ms: u64,
    pub timestamp: DateTime<Utc>,
}

impl ExecutionLogEntry {
    /// Log entry for a node that produced a result
    pub fn success(node: &WorkflowNode, result: Value, duration_ms: u64) -> Self {
        Self {
            node_id: node.id.clone(),
            kind: node.kind,
            status: StepStatus::Success,
            result: Some(result),
            error: None,
            duration_ms,
            timestamp: Utc::now(),
        }
    }

    /// Log entry for a node that failed (and aborted the run)
    pub fn error(node: &WorkflowNode, message: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            node_id: node.id.clone(),
            kind: node.kind,
            status: StepStatus::Error,
            result: None,
            error: Some(message.into()),
            duration_ms,
            timestamp: Utc::now(),
        }
    }
}

/// The persisted execution record
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExecutionRecord {
    pub id: String,
    pub workflow_id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    pub status: ExecutionStatus,
    #[serde(default)]
    pub input_data: Value,
    #[serde(default)]
    pub output_data: Value,
    #[serde(default)]
    pub execution_log: Vec<ExecutionLogEntry>,
    #[serde(default)]
    pub error_message: Option<String>,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration_ms: Option<u64>,
    #[serde(default)]
    pub cost: f64,
}

impl ExecutionRecord {
    /// Create a fresh `pending` record for a workflow and input payload
    pub fn pending(id: impl Into<String>, workflow_id: impl Into<String>, input: Value) -> Self {
        Self {
            id: id.into(),
            workflow_id: workflow_id.into(),
            user_id: None,
            status: ExecutionStatus::Pending,
            input_data: input,
            output_data: Value::Null,
            execution_log: Vec::new(),
            error_message: None,
            started_at: Utc::now(),
            completed_at: None,
            duration_ms: None,
            cost: 0.0,
        }
    }
}

/// The persisted workflow definition record the caller fetches before a run
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkflowRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub workflow_data: WorkflowGraph,
    #[serde(default)]
    pub execution_count: u64,
    #[serde(default)]
    pub last_executed: Option<DateTime<Utc>>,
}

/// Partial update applied to an execution record; `None` fields are left
/// untouched by the store.
#[derive(Debug, Clone, Default)]
pub struct ExecutionUpdate {
    pub status: Option<ExecutionStatus>,
    pub output_data: Option<Value>,
    pub execution_log: Option<Vec<ExecutionLogEntry>>,
    pub error_message: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub duration_ms: Option<u64>,
}

impl ExecutionUpdate {
    /// Transition to `running` with an empty log
    pub fn running() -> Self {
        Self {
            status: Some(ExecutionStatus::Running),
            execution_log: Some(Vec::new()),
            ..Default::default()
        }
    }

    /// Per-node log refresh
    pub fn log(entries: &[ExecutionLogEntry]) -> Self {
        Self {
            execution_log: Some(entries.to_vec()),
            ..Default::default()
        }
    }

    /// Successful finalization
    pub fn completed(output: Value, entries: &[ExecutionLogEntry], duration_ms: u64) -> Self {
        Self {
            status: Some(ExecutionStatus::Completed),
            output_data: Some(output),
            execution_log: Some(entries.to_vec()),
            completed_at: Some(Utc::now()),
            duration_ms: Some(duration_ms),
            ..Default::default()
        }
    }

    /// Failed finalization; the log carries the failing node's entry
    pub fn failed(
        error_message: impl Into<String>,
        entries: &[ExecutionLogEntry],
        duration_ms: u64,
    ) -> Self {
        Self {
            status: Some(ExecutionStatus::Failed),
            execution_log: Some(entries.to_vec()),
            error_message: Some(error_message.into()),
            completed_at: Some(Utc::now()),
            duration_ms: Some(duration_ms),
            ..Default::default()
        }
    }
}
