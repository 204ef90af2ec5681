//! `sqlgate credentials` - resolve the configured service account offline.
//!
//! Checks that the key can be found and is well formed; it does not contact
//! the execution engine.

use super::Report;
use serde_json::json;
use sqlgate_core::GateConfig;

pub fn resolve(config: &GateConfig) -> Report {
    match config.resolve_credentials() {
        Ok(account) => Report::success(json!({
            "valid": true,
            "project_id": account.project_id,
            "client_email": account.client_email(),
        })),
        Err(err) => {
            tracing::warn!(error = %err, "Credentials did not resolve");
            Report::failure(json!({
                "valid": false,
                "message": err.to_string(),
            }))
        }
    }
}
