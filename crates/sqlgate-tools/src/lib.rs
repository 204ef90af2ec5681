//! # sqlgate-tools
//!
//! Query and mutation tools built on the SQL Gate statement validator.
//!
//! Each tool gates the caller's statement for its entry point, runs the
//! canonical text on a freshly built execution client, and streams the result
//! back as [`ToolMessage`]s:
//!
//! | Tool | Entry point | Messages |
//! |------|-------------|----------|
//! | `sql_query` | `QueryOnly` | `data`, `columns`, `{"data": [...]}` |
//! | `sql_mutation` | `MutationOnly` | `affected_rows`, `{"affected_rows": n, "success": true}` |
//!
//! ```text
//! arguments ──▶ StatementGate ──▶ ClientFactory::connect ──▶ QueryClient::query
//!                  │ reject                                      │
//!                  ▼                                             ▼
//!              ToolError                              close ─▶ MessageStream
//! ```
//!
//! The execution engine itself is not part of this crate; callers provide it
//! through [`ClientFactory`] and [`QueryClient`].

pub mod client;
pub mod error;
pub mod executor;
pub mod limits;
pub mod protocol;
pub mod provider;
pub mod tools;

pub use client::{ClientFactory, ExecutionError, QueryClient, QueryOutput};
pub use error::ToolError;
pub use executor::ToolRuntime;
pub use limits::{DEFAULT_MAX_FETCHED_ROWS, coerce_row_limit};
pub use protocol::{ToolAnnotations, ToolDefinition, ToolMessage};
pub use provider::{CREDENTIAL_CHECK_QUERY, validate_credentials};
pub use tools::{
    MUTATION_TOOL, MessageStream, MutationTool, QUERY_TOOL, QueryTool, SqlTool, ToolRegistry,
    mutation_tool_definition, query_tool_definition,
};
