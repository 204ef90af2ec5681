//! `sqlgate tools` - list the tool definitions for the configured dialect.

use super::Report;
use anyhow::{Context, Result};
use serde_json::{Value, json};
use sqlgate_core::SqlDialect;
use sqlgate_tools::{ToolDefinition, mutation_tool_definition, query_tool_definition};

pub fn definitions(dialect: SqlDialect) -> Vec<ToolDefinition> {
    vec![
        query_tool_definition(dialect),
        mutation_tool_definition(dialect),
    ]
}

pub fn list(dialect: SqlDialect, verbose: bool) -> Result<Report> {
    let tools = definitions(dialect)
        .into_iter()
        .map(|tool| {
            if verbose {
                return serde_json::to_value(&tool)
                    .with_context(|| format!("Failed to serialize tool {}", tool.name));
            }
            let read_only = tool
                .annotations
                .as_ref()
                .and_then(|a| a.read_only)
                .unwrap_or(false);
            let access = if read_only { "read" } else { "write" };
            Ok(json!({
                "name": tool.name,
                "access": access,
                "description": tool.description,
            }))
        })
        .collect::<Result<Vec<Value>>>()?;

    Ok(Report::success(json!({ "dialect": dialect.as_str(), "tools": tools })))
}
