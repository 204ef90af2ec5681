//! Error types for the tools crate.

use crate::client::ExecutionError;
use sqlgate_core::{CredentialsError, OperationKind};
use sqlgate_guard::GateError;
use thiserror::Error;

/// Errors that can occur while invoking a tool.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The statement was rejected before execution.
    #[error(transparent)]
    Gate(#[from] GateError),

    /// Credentials could not be resolved.
    #[error(transparent)]
    Credentials(#[from] CredentialsError),

    /// Tool not found.
    #[error("tool not found: {name}")]
    ToolNotFound { name: String },

    /// Invalid arguments for tool.
    #[error("invalid arguments for tool {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },

    /// The execution engine failed the job.
    #[error("{operation} execution failed: {source} (sql: {sql})")]
    Execution {
        operation: OperationKind,
        sql: String,
        #[source]
        source: ExecutionError,
    },

    /// A credential check against the engine failed.
    #[error("credential validation failed: {0}")]
    CredentialValidation(String),
}

impl ToolError {
    /// The engine's own error, for execution failures.
    pub fn execution_cause(&self) -> Option<&ExecutionError> {
        match self {
            ToolError::Execution { source, .. } => Some(source),
            _ => None,
        }
    }
}
