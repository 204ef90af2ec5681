//! The query and mutation tools, and a registry to look them up by name.

use crate::client::QueryOutput;
use crate::error::ToolError;
use crate::executor::ToolRuntime;
use crate::limits::coerce_row_limit;
use crate::protocol::{ToolAnnotations, ToolDefinition, ToolMessage};
use futures::stream::BoxStream;
use serde_json::{Map, Value, json};
use sqlgate_core::{EntryPointMode, SqlDialect};
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

/// Name of the read-only tool.
pub const QUERY_TOOL: &str = "sql_query";
/// Name of the write tool.
pub const MUTATION_TOOL: &str = "sql_mutation";

/// Definition of the query tool for a dialect.
pub fn query_tool_definition(dialect: SqlDialect) -> ToolDefinition {
    ToolDefinition {
        name: QUERY_TOOL.to_string(),
        description: Some(format!(
            "Run a read-only SELECT statement ({} dialect) and return its rows",
            dialect
        )),
        input_schema: json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "SELECT statement with all values written inline"
                },
                "max_fetched_rows": {
                    "type": ["integer", "string"],
                    "description": "Maximum rows to return (default 100)"
                }
            },
            "required": ["query"]
        }),
        annotations: Some(ToolAnnotations {
            read_only: Some(true),
        }),
    }
}

/// Definition of the mutation tool for a dialect.
pub fn mutation_tool_definition(dialect: SqlDialect) -> ToolDefinition {
    ToolDefinition {
        name: MUTATION_TOOL.to_string(),
        description: Some(format!(
            "Run an INSERT, UPDATE or DELETE statement ({} dialect) and report affected rows",
            dialect
        )),
        input_schema: json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "INSERT, UPDATE or DELETE statement with all values written inline"
                }
            },
            "required": ["query"]
        }),
        annotations: Some(ToolAnnotations {
            read_only: Some(false),
        }),
    }
}

/// Output of one invocation. Finite, ordered, consumed once.
pub type MessageStream = BoxStream<'static, Result<ToolMessage, ToolError>>;

/// A tool that gates a statement and, once accepted, runs it.
pub trait SqlTool: Send + Sync {
    fn definition(&self) -> ToolDefinition;

    /// The entry point statements arrive through.
    fn mode(&self) -> EntryPointMode;

    /// Validate the arguments and return the lazy output stream.
    ///
    /// Validation failures are returned here, before any client is built.
    /// Execution happens when the stream is first polled.
    fn invoke(&self, arguments: &Map<String, Value>) -> Result<MessageStream, ToolError>;
}

/// Runs `SELECT` statements and returns their rows.
#[derive(Clone)]
pub struct QueryTool {
    runtime: ToolRuntime,
}

impl QueryTool {
    pub fn new(runtime: ToolRuntime) -> Self {
        Self { runtime }
    }
}

impl SqlTool for QueryTool {
    fn definition(&self) -> ToolDefinition {
        query_tool_definition(self.runtime.gate().dialect())
    }

    fn mode(&self) -> EntryPointMode {
        EntryPointMode::QueryOnly
    }

    fn invoke(&self, arguments: &Map<String, Value>) -> Result<MessageStream, ToolError> {
        let max_fetched_rows = coerce_row_limit(arguments.get("max_fetched_rows"));
        let statement = self.runtime.validate(QUERY_TOOL, arguments, self.mode())?;
        let runtime = self.runtime.clone();
        let invocation_id = Uuid::new_v4();

        let stream = async_stream::stream! {
            match runtime.run(&statement, Some(max_fetched_rows), invocation_id).await {
                Ok(output) => {
                    let messages = query_messages(output, max_fetched_rows);
                    tracing::info!(
                        invocation_id = %invocation_id,
                        sql = %statement.canonical_sql,
                        max_fetched_rows,
                        "SQL select completed"
                    );
                    for message in messages {
                        yield Ok(message);
                    }
                }
                Err(err) => yield Err(err),
            }
        };

        Ok(Box::pin(stream))
    }
}

/// Runs `INSERT`, `UPDATE` and `DELETE` statements and reports affected rows.
#[derive(Clone)]
pub struct MutationTool {
    runtime: ToolRuntime,
}

impl MutationTool {
    pub fn new(runtime: ToolRuntime) -> Self {
        Self { runtime }
    }
}

impl SqlTool for MutationTool {
    fn definition(&self) -> ToolDefinition {
        mutation_tool_definition(self.runtime.gate().dialect())
    }

    fn mode(&self) -> EntryPointMode {
        EntryPointMode::MutationOnly
    }

    fn invoke(&self, arguments: &Map<String, Value>) -> Result<MessageStream, ToolError> {
        let statement = self.runtime.validate(MUTATION_TOOL, arguments, self.mode())?;
        let runtime = self.runtime.clone();
        let invocation_id = Uuid::new_v4();

        let stream = async_stream::stream! {
            match runtime.run(&statement, None, invocation_id).await {
                Ok(output) => {
                    let affected_rows = output.num_dml_affected_rows.unwrap_or(0);
                    tracing::info!(
                        invocation_id = %invocation_id,
                        operation = %statement.operation,
                        sql = %statement.canonical_sql,
                        affected_rows,
                        "SQL mutation completed"
                    );
                    for message in mutation_messages(affected_rows) {
                        yield Ok(message);
                    }
                }
                Err(err) => yield Err(err),
            }
        };

        Ok(Box::pin(stream))
    }
}

/// `data` rows, `columns`, then the rows as objects keyed by column.
fn query_messages(output: QueryOutput, max_fetched_rows: u64) -> Vec<ToolMessage> {
    let QueryOutput {
        columns, mut rows, ..
    } = output;
    rows.truncate(usize::try_from(max_fetched_rows).unwrap_or(usize::MAX));
    tracing::debug!(count = rows.len(), "Fetched rows");

    let records: Vec<Value> = rows
        .iter()
        .map(|row| {
            let record: Map<String, Value> =
                columns.iter().cloned().zip(row.iter().cloned()).collect();
            Value::Object(record)
        })
        .collect();
    let data: Vec<Value> = rows.into_iter().map(Value::Array).collect();

    vec![
        ToolMessage::variable("data", Value::Array(data)),
        ToolMessage::variable("columns", json!(columns)),
        ToolMessage::json(json!({ "data": records })),
    ]
}

fn mutation_messages(affected_rows: u64) -> Vec<ToolMessage> {
    vec![
        ToolMessage::variable("affected_rows", json!(affected_rows)),
        ToolMessage::json(json!({
            "affected_rows": affected_rows,
            "success": true
        })),
    ]
}

/// Registry of available tools.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn SqlTool>>,
}

impl ToolRegistry {
    /// Create a new empty tool registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the query and mutation tools over one runtime.
    pub fn with_builtin(runtime: ToolRuntime) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(QueryTool::new(runtime.clone())));
        registry.register(Arc::new(MutationTool::new(runtime)));
        registry
    }

    /// Register a tool under its definition's name.
    pub fn register(&mut self, tool: Arc<dyn SqlTool>) {
        self.tools.insert(tool.definition().name, tool);
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn SqlTool>> {
        self.tools.get(name)
    }

    /// Check if a tool exists.
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Definitions of all tools, ordered by name.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.definition()).collect()
    }

    /// Get tool names.
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Invoke a tool by name.
    pub fn call(
        &self,
        name: &str,
        arguments: &Map<String, Value>,
    ) -> Result<MessageStream, ToolError> {
        let tool = self.get(name).ok_or_else(|| ToolError::ToolNotFound {
            name: name.to_string(),
        })?;
        tool.invoke(arguments)
    }
}
