//! Execution client seam.
//!
//! The engine that actually runs statements lives outside this workspace. Tools
//! talk to it through [`ClientFactory`] and [`QueryClient`]. A fresh client is
//! built for every invocation and closed before the invocation completes; there
//! is no pooling.

use async_trait::async_trait;
use serde_json::Value;
use sqlgate_core::{ExecutionConfig, ServiceAccountConfig};
use thiserror::Error;

/// A failure reported by the execution engine, kept as the engine described it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ExecutionError {
    /// Engine-side error class, e.g. `BadRequest` or `Forbidden`.
    pub kind: String,
    pub message: String,
}

impl ExecutionError {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

/// What a finished job returned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOutput {
    /// Column names from the result schema.
    pub columns: Vec<String>,
    /// Rows, each with one value per column.
    pub rows: Vec<Vec<Value>>,
    /// Rows touched by a DML job, when the engine reports it.
    pub num_dml_affected_rows: Option<u64>,
}

/// A connected, authorized execution client.
#[async_trait]
pub trait QueryClient: Send + Sync {
    /// Run one statement and wait for it to finish.
    ///
    /// `max_results` caps the rows fetched; `None` fetches the engine default.
    async fn query(
        &self,
        sql: &str,
        config: &ExecutionConfig,
        max_results: Option<u64>,
    ) -> Result<QueryOutput, ExecutionError>;

    /// Release the client's resources.
    async fn close(&self);
}

/// Builds an execution client for a service account.
#[async_trait]
pub trait ClientFactory: Send + Sync {
    async fn connect(
        &self,
        account: &ServiceAccountConfig,
    ) -> Result<Box<dyn QueryClient>, ExecutionError>;
}
