//! Credential validation against the execution engine.

use crate::client::ClientFactory;
use crate::error::ToolError;
use crate::executor::ClientGuard;
use sqlgate_core::{CredentialsConfig, ExecutionConfig, ServiceAccountConfig};
use uuid::Uuid;

/// Statement used to prove a service account can run jobs.
pub const CREDENTIAL_CHECK_QUERY: &str = "SELECT 1 AS test";

/// Resolve credentials and prove them by running [`CREDENTIAL_CHECK_QUERY`].
///
/// Resolution failures keep their own error; anything the engine reports is
/// [`ToolError::CredentialValidation`]. The client is closed either way.
pub async fn validate_credentials(
    factory: &dyn ClientFactory,
    credentials: &CredentialsConfig,
) -> Result<ServiceAccountConfig, ToolError> {
    let account = credentials.resolve()?;

    let client = factory
        .connect(&account)
        .await
        .map_err(|e| ToolError::CredentialValidation(e.to_string()))?;
    let client = ClientGuard::new(client, Uuid::new_v4());

    let outcome = client
        .query(CREDENTIAL_CHECK_QUERY, &ExecutionConfig::default(), None)
        .await;
    client.close().await;

    match outcome {
        Ok(_) => {
            tracing::info!(
                project_id = %account.project_id,
                client_email = account.client_email().unwrap_or_default(),
                "Credentials validated"
            );
            Ok(account)
        }
        Err(e) => {
            tracing::warn!(project_id = %account.project_id, error = %e, "Credential check failed");
            Err(ToolError::CredentialValidation(e.to_string()))
        }
    }
}
