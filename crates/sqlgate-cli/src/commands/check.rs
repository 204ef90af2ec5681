//! `sqlgate check` and `sqlgate inspect`.
//!
//! `check` runs the full gate for one entry point and prints either the
//! operation and canonical text or the rejection. `inspect` parses and reports
//! the operation and every parameter marker without judging them.

use super::Report;
use serde_json::json;
use sqlgate_core::EntryPointMode;
use sqlgate_guard::{GateError, StatementGate};

/// Gate `sql` for `mode`.
pub fn check(gate: &StatementGate, sql: &str, mode: EntryPointMode) -> Report {
    match gate.validate(sql, mode) {
        Ok(validated) => {
            tracing::debug!(operation = %validated.operation, "Statement accepted");
            Report::success(json!({
                "accepted": true,
                "mode": mode.as_str(),
                "operation": validated.operation,
                "canonical_sql": validated.canonical_sql,
            }))
        }
        Err(err) => {
            if err.is_internal() {
                tracing::error!(error = %err, "Statement could not be rendered");
            }
            Report::failure(rejection(&err, Some(mode)))
        }
    }
}

/// Report the operation and markers of `sql`.
pub fn inspect(gate: &StatementGate, sql: &str) -> Report {
    match gate.inspect(sql) {
        Ok(inspection) => {
            let markers: Vec<_> = inspection
                .markers
                .iter()
                .map(|m| json!({ "kind": m.kind.to_string(), "token": m.token }))
                .collect();
            let permitted_by: Vec<&str> = [EntryPointMode::QueryOnly, EntryPointMode::MutationOnly]
                .into_iter()
                .filter(|mode| mode.permits(inspection.operation))
                .map(|mode| mode.as_str())
                .collect();

            Report::success(json!({
                "dialect": gate.dialect().as_str(),
                "operation": inspection.operation,
                "markers": markers,
                "permitted_by": permitted_by,
            }))
        }
        Err(err) => Report::failure(rejection(&err, None)),
    }
}

fn rejection(err: &GateError, mode: Option<EntryPointMode>) -> serde_json::Value {
    let mut body = json!({
        "accepted": false,
        "error": err.code(),
        "message": err.to_string(),
    });
    if let Some(mode) = mode {
        body["mode"] = json!(mode.as_str());
    }
    if let Some(marker) = err.marker() {
        body["marker"] = json!(marker.to_string());
    }
    body
}
