// SPDX-License-Identifier: MIT

//! Workflow executor - lifecycle orchestration and node interpretation
//!
//! One `execute` call drives one run: the execution record is marked
//! `running`, the graph is ordered once, then each node is interpreted
//! strictly sequentially against the shared context. Every node outcome is
//! appended to the execution log and persisted before the next node starts,
//! so observers polling the record see progress as it happens. The first
//! node failure aborts the run (`failed`, with the error message recorded);
//! otherwise the output-node mapping is built and the run finalizes
//! `completed`. Node failures never escape `execute` - only persistence
//! failures do.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

use super::condition;
use super::context::{value_to_string, ExecutionContext};
use super::error::{FlowError, NodeError};
use super::graph::{
    ApiCallConfig, ConditionConfig, InputConfig, LoopConfig, LoopKind, ModelConfig, NodeKind,
    OutputConfig, PromptConfig, TransformConfig, WorkflowGraph, WorkflowNode,
};
use super::order::execution_order;
use super::record::{ExecutionLogEntry, ExecutionStatus, ExecutionUpdate, WorkflowRecord};
use super::transform;
use crate::provider::{GenerateRequest, ProviderRegistry};
use crate::store::ExecutionStore;

const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Executes workflow graphs against a persistence handle and a provider
/// registry. Cheap to clone; clones share the store, registry, and HTTP
/// connection pool.
#[derive(Clone)]
pub struct WorkflowExecutor {
    store: Arc<dyn ExecutionStore>,
    providers: Arc<ProviderRegistry>,
    http: Client,
}

impl WorkflowExecutor {
    pub fn new(store: Arc<dyn ExecutionStore>, providers: Arc<ProviderRegistry>) -> Self {
        Self {
            store,
            providers,
            http: Client::new(),
        }
    }

    /// Run one execution to completion.
    ///
    /// The record behind `execution_id` must exist in `pending` status.
    /// Returns the terminal status; node failures are recorded on the
    /// execution record rather than returned as errors.
    pub async fn execute(
        &self,
        execution_id: &str,
        workflow: &WorkflowRecord,
        input: Value,
    ) -> Result<ExecutionStatus, FlowError> {
        let run_start = Instant::now();
        let mut entries: Vec<ExecutionLogEntry> = Vec::new();

        log::info!(
            "execution {} starting for workflow {}",
            execution_id,
            workflow.id
        );
        self.store
            .update_execution(execution_id, ExecutionUpdate::running())
            .await?;

        let graph = &workflow.workflow_data;
        let mut context = ExecutionContext::from_input(&input);
        let order = execution_order(graph);

        let mut failure: Option<NodeError> = None;
        for node_id in &order {
            // Ids that survived ordering but name no node are skipped, not errors.
            let Some(node) = graph.node(node_id) else {
                continue;
            };

            let step_start = Instant::now();
            match self.execute_node(node, &context).await {
                Ok(result) => {
                    let duration = elapsed_ms(step_start);
                    log::info!(
                        "node {} ({}) completed in {}ms",
                        node.id,
                        node.kind.as_str(),
                        duration
                    );
                    context.insert(node.id.clone(), result.clone());
                    entries.push(ExecutionLogEntry::success(node, result, duration));
                    self.store
                        .update_execution(execution_id, ExecutionUpdate::log(&entries))
                        .await?;
                }
                Err(e) => {
                    let duration = elapsed_ms(step_start);
                    log::error!("node {} failed: {}", node.id, e);
                    entries.push(ExecutionLogEntry::error(node, e.to_string(), duration));
                    failure = Some(e);
                    break;
                }
            }
        }

        let total = elapsed_ms(run_start);
        match failure {
            None => {
                let output = collect_outputs(graph, &context);
                self.store
                    .update_execution(
                        execution_id,
                        ExecutionUpdate::completed(output, &entries, total),
                    )
                    .await?;
                self.store.mark_workflow_executed(&workflow.id).await?;
                log::info!("execution {} completed in {}ms", execution_id, total);
                Ok(ExecutionStatus::Completed)
            }
            Some(error) => {
                self.store
                    .update_execution(
                        execution_id,
                        ExecutionUpdate::failed(error.to_string(), &entries, total),
                    )
                    .await?;
                log::warn!("execution {} failed after {}ms: {}", execution_id, total, error);
                Ok(ExecutionStatus::Failed)
            }
        }
    }

    /// Interpret a single node against the current context
    async fn execute_node(
        &self,
        node: &WorkflowNode,
        context: &ExecutionContext,
    ) -> Result<Value, NodeError> {
        match node.kind {
            NodeKind::Input => {
                let config: InputConfig = node.config()?;
                Ok(context
                    .get(&config.name)
                    .cloned()
                    .unwrap_or_else(|| config.default_value.unwrap_or(Value::Null)))
            }
            NodeKind::Output => {
                let config: OutputConfig = node.config()?;
                Ok(context.resolve(&config.value))
            }
            NodeKind::Prompt => {
                let config: PromptConfig = node.config()?;
                Ok(Value::String(
                    context.render_template(&config.template, &config.variables),
                ))
            }
            NodeKind::AiModel => self.run_model(node, context).await,
            NodeKind::DataTransform => {
                let config: TransformConfig = node.config()?;
                let input = context.resolve(&config.input);
                transform::apply(config.operation, input, &config.parameters)
            }
            NodeKind::Condition => {
                let config: ConditionConfig = node.config()?;
                let left = context.resolve(&config.left);
                let right = context.resolve(&config.right);
                Ok(Value::Bool(condition::evaluate(
                    &left,
                    config.operator,
                    &right,
                )))
            }
            NodeKind::Loop => run_loop(node, context),
            NodeKind::ApiCall => self.api_call(node, context).await,
            NodeKind::Unknown => Err(NodeError::UnknownKind(node.kind.as_str().to_string())),
        }
    }

    async fn run_model(
        &self,
        node: &WorkflowNode,
        context: &ExecutionContext,
    ) -> Result<Value, NodeError> {
        let config: ModelConfig = node.config()?;
        let prompt = value_to_string(&context.resolve(&config.prompt));
        let generator = self.providers.get(&config.provider)?;

        let text = generator
            .generate(&GenerateRequest {
                model: config.model,
                prompt,
                temperature: config.temperature.unwrap_or(DEFAULT_TEMPERATURE),
                max_tokens: config.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            })
            .await?;
        Ok(Value::String(text))
    }

    async fn api_call(
        &self,
        node: &WorkflowNode,
        context: &ExecutionContext,
    ) -> Result<Value, NodeError> {
        let config: ApiCallConfig = node.config()?;
        let url = value_to_string(&context.resolve(&config.url));
        let method_name = config.method.as_deref().unwrap_or("GET").to_uppercase();
        let method = Method::from_bytes(method_name.as_bytes())
            .map_err(|_| NodeError::malformed(format!("invalid HTTP method: {method_name}")))?;

        // Default JSON content type; resolved custom headers may override it.
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, expression) in &config.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| NodeError::malformed(format!("invalid header name: {name}")))?;
            let value = value_to_string(&context.resolve(expression));
            let header_value = HeaderValue::from_str(&value)
                .map_err(|_| NodeError::malformed(format!("invalid value for header {name}")))?;
            headers.insert(header_name, header_value);
        }

        let mut request = self.http.request(method.clone(), &url).headers(headers);
        if method != Method::GET {
            if let Some(body) = &config.body {
                request = request.json(&context.resolve(body));
            }
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NodeError::HttpStatus {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        Ok(response.json().await?)
    }
}

fn run_loop(node: &WorkflowNode, context: &ExecutionContext) -> Result<Value, NodeError> {
    let config: LoopConfig = node.config()?;
    match config.kind {
        LoopKind::ForEach => {
            let items = context.resolve(&config.items);
            let Value::Array(items) = items else {
                return Err(NodeError::malformed("For-each loop requires an array"));
            };
            // Body sub-execution is not implemented; the resolved sequence
            // itself is the node result.
            Ok(Value::Array(items))
        }
        LoopKind::Other => Ok(Value::Array(Vec::new())),
    }
}

/// Build the final output mapping: each `output` node's configured name
/// (falling back to the node id) mapped to its context value.
fn collect_outputs(graph: &WorkflowGraph, context: &ExecutionContext) -> Value {
    let mut outputs = serde_json::Map::new();
    for node in graph.nodes.iter().filter(|n| n.kind == NodeKind::Output) {
        let name = node
            .config::<OutputConfig>()
            .ok()
            .and_then(|c| c.name)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| node.id.clone());
        let value = context.get(&node.id).cloned().unwrap_or(Value::Null);
        outputs.insert(name, value);
    }
    Value::Object(outputs)
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
