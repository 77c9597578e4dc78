// SPDX-License-Identifier: MIT

//! Data-transform node operations
//!
//! A fixed set of operations over an already-resolved input value:
//! - `json-parse` / `json-stringify`
//! - `text-split` (default delimiter: newline) / `text-join` (default: one space)
//! - `text-replace` (search treated as a pattern, replaced globally)
//! - `extract-field` (index into the input by field name)
//!
//! Unrecognized operations return the input unchanged.

use regex::Regex;
use serde_json::Value;

use super::context::value_to_string;
use super::error::NodeError;
use super::graph::{TransformOp, TransformParams};

/// Apply a transform operation to a resolved input value
pub fn apply(op: TransformOp, input: Value, params: &TransformParams) -> Result<Value, NodeError> {
    match op {
        TransformOp::JsonParse => json_parse(input),
        TransformOp::JsonStringify => json_stringify(&input),
        TransformOp::TextSplit => text_split(input, params),
        TransformOp::TextJoin => Ok(text_join(input, params)),
        TransformOp::TextReplace => text_replace(input, params),
        TransformOp::ExtractField => Ok(extract_field(&input, params)),
        TransformOp::Other => Ok(input),
    }
}

fn json_parse(input: Value) -> Result<Value, NodeError> {
    let Value::String(text) = input else {
        return Err(NodeError::malformed("json-parse requires a string input"));
    };
    serde_json::from_str(&text).map_err(|e| NodeError::malformed(format!("json-parse failed: {e}")))
}

fn json_stringify(input: &Value) -> Result<Value, NodeError> {
    let text = serde_json::to_string(input)
        .map_err(|e| NodeError::malformed(format!("json-stringify failed: {e}")))?;
    Ok(Value::String(text))
}

fn text_split(input: Value, params: &TransformParams) -> Result<Value, NodeError> {
    let Value::String(text) = input else {
        return Err(NodeError::malformed("text-split requires a string input"));
    };
    let delimiter = params.delimiter.as_deref().unwrap_or("\n");
    let parts = text
        .split(delimiter)
        .map(|part| Value::String(part.to_string()))
        .collect();
    Ok(Value::Array(parts))
}

fn text_join(input: Value, params: &TransformParams) -> Value {
    // Non-array input is a no-op, not an error.
    let Value::Array(items) = input else {
        return input;
    };
    let delimiter = params.delimiter.as_deref().unwrap_or(" ");
    let joined = items
        .iter()
        .map(value_to_string)
        .collect::<Vec<_>>()
        .join(delimiter);
    Value::String(joined)
}

fn text_replace(input: Value, params: &TransformParams) -> Result<Value, NodeError> {
    let Value::String(text) = input else {
        return Err(NodeError::malformed("text-replace requires a string input"));
    };
    let search = params
        .search
        .as_deref()
        .ok_or_else(|| NodeError::malformed("text-replace requires a search parameter"))?;
    let replace = params.replace.as_deref().unwrap_or("");
    let pattern = Regex::new(search)
        .map_err(|e| NodeError::malformed(format!("text-replace pattern invalid: {e}")))?;
    Ok(Value::String(
        pattern.replace_all(&text, replace).into_owned(),
    ))
}

fn extract_field(input: &Value, params: &TransformParams) -> Value {
    let field = params.field.as_deref().unwrap_or_default();
    match input {
        Value::Object(map) => map.get(field).cloned().unwrap_or(Value::Null),
        Value::Array(items) => field
            .parse::<usize>()
            .ok()
            .and_then(|index| items.get(index).cloned())
            .unwrap_or(Value::Null),
        _ => Value::Null,
    }
}
