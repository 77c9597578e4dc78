use clap::{Parser, Subcommand};
use dotenv::dotenv;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use flowrun_rs::engine::record::{ExecutionRecord, ExecutionStatus, StepStatus};
use flowrun_rs::engine::{WorkflowExecutor, WorkflowLoader};
use flowrun_rs::provider::ProviderRegistry;
use flowrun_rs::server;
use flowrun_rs::store::{ExecutionStore, MemoryStore};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Execute a workflow file once and print the result
    Run {
        /// Path to the workflow definition (YAML or JSON)
        #[arg(short, long)]
        file: String,

        /// Input payload as a JSON object
        #[arg(short, long, default_value = "{}")]
        input: String,
    },
    /// Serve the HTTP API
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = 8080)]
        port: u16,

        /// Directory of workflow definition files
        #[arg(short, long, default_value = "workflows")]
        dir: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    match args.command {
        Commands::Run { file, input } => {
            let input: Value = serde_json::from_str(&input)?;
            let workflow = WorkflowLoader::load(&file)?.into_record();

            let store = MemoryStore::new();
            store.insert_workflow(workflow.clone()).await;

            let execution_id = Uuid::new_v4().to_string();
            store
                .insert_execution(ExecutionRecord::pending(
                    &execution_id,
                    &workflow.id,
                    input.clone(),
                ))
                .await?;

            let executor = WorkflowExecutor::new(
                Arc::new(store.clone()),
                Arc::new(ProviderRegistry::with_builtin()),
            );

            println!("Running workflow: {}", workflow.name);
            let status = executor.execute(&execution_id, &workflow, input).await?;
            let record = store.get_execution(&execution_id).await?;

            for entry in &record.execution_log {
                match entry.status {
                    StepStatus::Success => println!(
                        "  {} ({}) completed in {}ms",
                        entry.node_id,
                        entry.kind.as_str(),
                        entry.duration_ms
                    ),
                    StepStatus::Error => println!(
                        "  {} ({}) failed: {}",
                        entry.node_id,
                        entry.kind.as_str(),
                        entry.error.as_deref().unwrap_or_default()
                    ),
                }
            }

            match status {
                ExecutionStatus::Completed => {
                    println!(
                        "Output: {}",
                        serde_json::to_string_pretty(&record.output_data)?
                    );
                }
                _ => {
                    anyhow::bail!(
                        "execution failed: {}",
                        record.error_message.unwrap_or_default()
                    );
                }
            }
        }
        Commands::Serve { port, dir } => {
            server::serve(port, &dir)
                .await
                .map_err(|e| anyhow::anyhow!(e))?;
        }
    }

    Ok(())
}
