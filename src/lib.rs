// SPDX-License-Identifier: MIT

//! flowrun-rs - workflow execution engine
//!
//! Executes declarative workflow graphs of typed nodes (prompts, AI-model
//! calls, data transforms, conditions, loops, inputs/outputs, API calls).
//! A graph is ordered once up front, then interpreted node by node against
//! a shared execution context while a structured log is written back to a
//! persisted execution record.

pub mod engine;
pub mod provider;
pub mod server;
pub mod store;
