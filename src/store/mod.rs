// SPDX-License-Identifier: MIT

//! Persistence handle for execution and workflow records
//!
//! The executor only ever talks to the `ExecutionStore` trait: it updates
//! the execution record after every node and bumps the workflow's
//! execution counter on success. `MemoryStore` is the in-process
//! implementation used by the CLI, the HTTP facade, and tests; real
//! database persistence lives behind this trait on the caller's side.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::engine::error::StoreError;
use crate::engine::record::{ExecutionRecord, ExecutionUpdate, WorkflowRecord};

/// Persistence operations the executor depends on
#[async_trait]
pub trait ExecutionStore: Send + Sync {
    /// Insert a freshly created execution record
    async fn insert_execution(&self, record: ExecutionRecord) -> Result<(), StoreError>;

    /// Fetch an execution record by id
    async fn get_execution(&self, id: &str) -> Result<ExecutionRecord, StoreError>;

    /// Apply a partial update to an execution record
    async fn update_execution(&self, id: &str, update: ExecutionUpdate) -> Result<(), StoreError>;

    /// Bump a workflow's execution counter and last-executed timestamp
    async fn mark_workflow_executed(&self, workflow_id: &str) -> Result<(), StoreError>;
}

/// In-memory store shared via `Arc<RwLock<_>>`; clones see the same data
#[derive(Clone, Default)]
pub struct MemoryStore {
    executions: Arc<RwLock<HashMap<String, ExecutionRecord>>>,
    workflows: Arc<RwLock<HashMap<String, WorkflowRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a workflow definition record
    pub async fn insert_workflow(&self, record: WorkflowRecord) {
        let mut workflows = self.workflows.write().await;
        workflows.insert(record.id.clone(), record);
    }

    /// Fetch a workflow definition record by id
    pub async fn get_workflow(&self, id: &str) -> Result<WorkflowRecord, StoreError> {
        let workflows = self.workflows.read().await;
        workflows
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::WorkflowNotFound(id.to_string()))
    }

    /// List registered workflow definition records
    pub async fn list_workflows(&self) -> Vec<WorkflowRecord> {
        let workflows = self.workflows.read().await;
        workflows.values().cloned().collect()
    }
}

#[async_trait]
impl ExecutionStore for MemoryStore {
    async fn insert_execution(&self, record: ExecutionRecord) -> Result<(), StoreError> {
        let mut executions = self.executions.write().await;
        executions.insert(record.id.clone(), record);
        Ok(())
    }

    async fn get_execution(&self, id: &str) -> Result<ExecutionRecord, StoreError> {
        let executions = self.executions.read().await;
        executions
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::ExecutionNotFound(id.to_string()))
    }

    async fn update_execution(&self, id: &str, update: ExecutionUpdate) -> Result<(), StoreError> {
        let mut executions = self.executions.write().await;
        let record = executions
            .get_mut(id)
            .ok_or_else(|| StoreError::ExecutionNotFound(id.to_string()))?;

        if let Some(status) = update.status {
            record.status = status;
        }
        if let Some(output_data) = update.output_data {
            record.output_data = output_data;
        }
        if let Some(execution_log) = update.execution_log {
            record.execution_log = execution_log;
        }
        if let Some(error_message) = update.error_message {
            record.error_message = Some(error_message);
        }
        if let Some(completed_at) = update.completed_at {
            record.completed_at = Some(completed_at);
        }
        if let Some(duration_ms) = update.duration_ms {
            record.duration_ms = Some(duration_ms);
        }
        Ok(())
    }

    async fn mark_workflow_executed(&self, workflow_id: &str) -> Result<(), StoreError> {
        let mut workflows = self.workflows.write().await;
        let record = workflows
            .get_mut(workflow_id)
            .ok_or_else(|| StoreError::WorkflowNotFound(workflow_id.to_string()))?;

        record.execution_count += 1;
        record.last_executed = Some(Utc::now());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::record::ExecutionStatus;
    use serde_json::json;

    fn sample_workflow(id: &str) -> WorkflowRecord {
        serde_json::from_value(json!({
            "id": id,
            "name": "demo",
            "workflow_data": { "nodes": [], "edges": [] }
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get_execution() {
        let store = MemoryStore::new();
        store
            .insert_execution(ExecutionRecord::pending("e1", "w1", json!({})))
            .await
            .unwrap();

        let record = store.get_execution("e1").await.unwrap();
        assert_eq!(record.status, ExecutionStatus::Pending);
        assert_eq!(record.workflow_id, "w1");
    }

    #[tokio::test]
    async fn test_get_missing_execution() {
        let store = MemoryStore::new();
        let err = store.get_execution("nope").await.unwrap_err();
        assert!(matches!(err, StoreError::ExecutionNotFound(_)));
    }

    #[tokio::test]
    async fn test_partial_update_leaves_other_fields() {
        let store = MemoryStore::new();
        store
            .insert_execution(ExecutionRecord::pending("e1", "w1", json!({"x": 1})))
            .await
            .unwrap();

        store
            .update_execution("e1", ExecutionUpdate::running())
            .await
            .unwrap();

        let record = store.get_execution("e1").await.unwrap();
        assert_eq!(record.status, ExecutionStatus::Running);
        // Untouched by the update
        assert_eq!(record.input_data, json!({"x": 1}));
        assert!(record.error_message.is_none());
    }

    #[tokio::test]
    async fn test_update_missing_execution_fails() {
        let store = MemoryStore::new();
        let err = store
            .update_execution("nope", ExecutionUpdate::running())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ExecutionNotFound(_)));
    }

    #[tokio::test]
    async fn test_mark_workflow_executed() {
        let store = MemoryStore::new();
        store.insert_workflow(sample_workflow("w1")).await;

        store.mark_workflow_executed("w1").await.unwrap();
        store.mark_workflow_executed("w1").await.unwrap();

        let record = store.get_workflow("w1").await.unwrap();
        assert_eq!(record.execution_count, 2);
        assert!(record.last_executed.is_some());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = MemoryStore::new();
        let cloned = store.clone();

        cloned
            .insert_execution(ExecutionRecord::pending("e1", "w1", json!({})))
            .await
            .unwrap();

        assert!(store.get_execution("e1").await.is_ok());
    }
}
