//! Tool execution engine.
//!
//! This module handles the part of an invocation that is shared by every tool:
//! - Reading the `query` argument
//! - Gating it for the tool's entry point
//! - Building a client, running the canonical statement, closing the client

use crate::client::{ClientFactory, ExecutionError, QueryClient, QueryOutput};
use crate::error::ToolError;
use serde_json::{Map, Value};
use sqlgate_core::{EntryPointMode, ExecutionConfig, ServiceAccountConfig};
use sqlgate_guard::{StatementGate, ValidatedStatement};
use std::sync::Arc;
use uuid::Uuid;

/// Everything a tool needs to validate and run statements.
///
/// Cheap to clone; clones share the factory and credentials.
#[derive(Clone)]
pub struct ToolRuntime {
    gate: StatementGate,
    factory: Arc<dyn ClientFactory>,
    account: Arc<ServiceAccountConfig>,
    execution: ExecutionConfig,
}

impl ToolRuntime {
    /// Create a new runtime.
    pub fn new(
        gate: StatementGate,
        factory: Arc<dyn ClientFactory>,
        account: ServiceAccountConfig,
    ) -> Self {
        Self {
            gate,
            factory,
            account: Arc::new(account),
            execution: ExecutionConfig::default(),
        }
    }

    /// Set the execution job configuration.
    pub fn with_execution_config(mut self, execution: ExecutionConfig) -> Self {
        self.execution = execution;
        self
    }

    pub fn gate(&self) -> &StatementGate {
        &self.gate
    }

    pub fn project_id(&self) -> &str {
        &self.account.project_id
    }

    /// Read the `query` argument and gate it for `mode`.
    pub fn validate(
        &self,
        tool: &str,
        arguments: &Map<String, Value>,
        mode: EntryPointMode,
    ) -> Result<ValidatedStatement, ToolError> {
        let query = match arguments.get("query") {
            None | Some(Value::Null) => "",
            Some(Value::String(s)) => s.as_str(),
            Some(other) => {
                return Err(ToolError::InvalidArguments {
                    tool: tool.to_string(),
                    reason: format!("query must be a string, got {}", other),
                });
            }
        };

        Ok(self.gate.validate(query, mode)?)
    }

    /// Run a validated statement on a fresh client.
    ///
    /// The client is closed whether the job succeeds or fails, and also when
    /// the caller stops waiting for it.
    pub async fn run(
        &self,
        statement: &ValidatedStatement,
        max_results: Option<u64>,
        invocation_id: Uuid,
    ) -> Result<QueryOutput, ToolError> {
        let wrap = |source| ToolError::Execution {
            operation: statement.operation,
            sql: statement.canonical_sql.clone(),
            source,
        };

        let client = self.factory.connect(&self.account).await.map_err(|e| {
            tracing::error!(
                invocation_id = %invocation_id,
                project_id = %self.account.project_id,
                error = %e,
                "Failed to build execution client"
            );
            wrap(e)
        })?;
        tracing::debug!(
            invocation_id = %invocation_id,
            project_id = %self.account.project_id,
            "Initialized execution client"
        );

        let client = ClientGuard::new(client, invocation_id);
        let outcome = client
            .query(&statement.canonical_sql, &self.execution, max_results)
            .await;
        client.close().await;

        outcome.map_err(|e| {
            tracing::error!(
                invocation_id = %invocation_id,
                operation = %statement.operation,
                sql = %statement.canonical_sql,
                error = %e,
                "Statement execution failed"
            );
            wrap(e)
        })
    }
}

/// Owns an invocation's client until it is closed.
///
/// Dropping the guard before [`ClientGuard::close`] (an output stream dropped
/// mid-job) still closes the client: on the current Tokio runtime when there is
/// one, otherwise in place.
pub(crate) struct ClientGuard {
    client: Option<Box<dyn QueryClient>>,
    invocation_id: Uuid,
}

impl ClientGuard {
    pub(crate) fn new(client: Box<dyn QueryClient>, invocation_id: Uuid) -> Self {
        Self {
            client: Some(client),
            invocation_id,
        }
    }

    pub(crate) async fn query(
        &self,
        sql: &str,
        config: &ExecutionConfig,
        max_results: Option<u64>,
    ) -> Result<QueryOutput, ExecutionError> {
        match &self.client {
            Some(client) => client.query(sql, config, max_results).await,
            None => Err(ExecutionError::new("ClientClosed", "client already closed")),
        }
    }

    pub(crate) async fn close(mut self) {
        if let Some(client) = self.client.take() {
            client.close().await;
        }
    }
}

impl Drop for ClientGuard {
    fn drop(&mut self) {
        let Some(client) = self.client.take() else {
            return;
        };

        tracing::debug!(
            invocation_id = %self.invocation_id,
            "Invocation abandoned mid-job, closing client"
        );
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move { client.close().await });
            }
            Err(_) => futures::executor::block_on(client.close()),
        }
    }
}
