// SPDX-License-Identifier: MIT

//! HTTP facade over the workflow engine
//!
//! Exposes workflow listing and execution over a small axum API. Executions
//! are fire-and-forget: the POST handler creates a pending record, spawns
//! the run, and returns the execution id; callers poll the execution
//! endpoint to watch the log grow and the status settle.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::fs;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::engine::loader::WorkflowLoader;
use crate::engine::record::ExecutionRecord;
use crate::engine::WorkflowExecutor;
use crate::provider::ProviderRegistry;
use crate::store::{ExecutionStore, MemoryStore};

#[derive(Clone)]
struct AppState {
    store: MemoryStore,
    executor: WorkflowExecutor,
}

/// Serve the API on the given port, with workflow definitions loaded from
/// `workflow_dir` at startup.
pub async fn serve(
    port: u16,
    workflow_dir: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let store = MemoryStore::new();
    load_definitions(&store, workflow_dir).await;

    let executor = WorkflowExecutor::new(
        Arc::new(store.clone()),
        Arc::new(ProviderRegistry::with_builtin()),
    );
    let state = AppState { store, executor };

    let app = router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    log::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/workflows", get(list_workflows))
        .route("/api/workflows/{id}", get(get_workflow))
        .route("/api/workflows/{id}/execute", post(execute_workflow))
        .route("/api/executions/{id}", get(get_execution))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn load_definitions(store: &MemoryStore, dir: &str) {
    let Ok(mut entries) = fs::read_dir(dir).await else {
        log::warn!("workflow directory {} not readable", dir);
        return;
    };

    while let Ok(Some(entry)) = entries.next_entry().await {
        let path = entry.path();
        let is_definition = path
            .extension()
            .is_some_and(|ext| ext == "yaml" || ext == "yml" || ext == "json");
        if !is_definition {
            continue;
        }

        match WorkflowLoader::load(&path) {
            Ok(definition) => {
                let record = definition.into_record();
                log::info!("Registered workflow: {} ({})", record.name, record.id);
                store.insert_workflow(record).await;
            }
            Err(e) => log::warn!("Skipping {}: {}", path.display(), e),
        }
    }
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn list_workflows(State(state): State<AppState>) -> Json<Value> {
    let workflows: Vec<Value> = state
        .store
        .list_workflows()
        .await
        .iter()
        .map(|w| {
            json!({
                "id": w.id,
                "name": w.name,
                "description": w.description,
                "execution_count": w.execution_count,
                "last_executed": w.last_executed,
            })
        })
        .collect();
    Json(json!(workflows))
}

async fn get_workflow(State(state): State<AppState>, Path(id): Path<String>) -> Json<Value> {
    match state.store.get_workflow(&id).await {
        Ok(workflow) => Json(serde_json::to_value(workflow).unwrap_or_default()),
        Err(e) => Json(json!({ "error": e.to_string() })),
    }
}

#[derive(Debug, Deserialize, Default)]
struct ExecuteRequest {
    #[serde(default)]
    input_data: Value,
}

async fn execute_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ExecuteRequest>,
) -> Json<Value> {
    let workflow = match state.store.get_workflow(&id).await {
        Ok(workflow) => workflow,
        Err(e) => return Json(json!({ "error": e.to_string() })),
    };

    let execution_id = Uuid::new_v4().to_string();
    let record = ExecutionRecord::pending(&execution_id, &workflow.id, body.input_data.clone());
    if let Err(e) = state.store.insert_execution(record).await {
        return Json(json!({ "error": e.to_string() }));
    }

    let executor = state.executor.clone();
    let spawned_id = execution_id.clone();
    tokio::spawn(async move {
        if let Err(e) = executor
            .execute(&spawned_id, &workflow, body.input_data)
            .await
        {
            log::error!("execution {} could not be persisted: {}", spawned_id, e);
        }
    });

    Json(json!({ "execution_id": execution_id }))
}

async fn get_execution(State(state): State<AppState>, Path(id): Path<String>) -> Json<Value> {
    match state.store.get_execution(&id).await {
        Ok(record) => Json(serde_json::to_value(record).unwrap_or_default()),
        Err(e) => Json(json!({ "error": e.to_string() })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::record::ExecutionStatus;

    fn sample_state() -> AppState {
        let store = MemoryStore::new();
        let executor = WorkflowExecutor::new(
            Arc::new(store.clone()),
            Arc::new(ProviderRegistry::new()),
        );
        AppState { store, executor }
    }

    #[tokio::test]
    async fn test_execute_flow_through_handlers() {
        let state = sample_state();
        let definition = WorkflowLoader::parse_json(
            r#"{
                "name": "echo",
                "nodes": [
                    { "id": "input-1", "type": "input", "data": { "name": "x" } },
                    { "id": "output-1", "type": "output", "data": { "value": "{{input-1}}" } }
                ],
                "edges": [{ "id": "e1", "source": "input-1", "target": "output-1" }]
            }"#,
        )
        .unwrap();
        let record = definition.into_record();
        let workflow_id = record.id.clone();
        state.store.insert_workflow(record).await;

        let response = execute_workflow(
            State(state.clone()),
            Path(workflow_id),
            Json(ExecuteRequest {
                input_data: json!({ "x": "hello" }),
            }),
        )
        .await;

        let execution_id = response.0["execution_id"].as_str().unwrap().to_string();

        // The run is spawned; poll until it settles.
        for _ in 0..50 {
            let record = state.store.get_execution(&execution_id).await.unwrap();
            if record.status == ExecutionStatus::Completed {
                assert_eq!(record.output_data, json!({ "output-1": "hello" }));
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        panic!("execution did not complete");
    }

    #[tokio::test]
    async fn test_execute_unknown_workflow_reports_error() {
        let state = sample_state();
        let response = execute_workflow(
            State(state),
            Path("missing".to_string()),
            Json(ExecuteRequest::default()),
        )
        .await;

        assert_eq!(response.0["error"], "Workflow not found: missing");
    }

    #[tokio::test]
    async fn test_get_execution_unknown_id() {
        let state = sample_state();
        let response = get_execution(State(state), Path("nope".to_string())).await;
        assert_eq!(response.0["error"], "Execution not found: nope");
    }
}
