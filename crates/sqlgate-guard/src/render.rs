//! Canonical rendering.
//!
//! Statements are rendered with the parser's own printer and then re-parsed in
//! the same dialect. The rendering is only handed on if it parses back to one
//! statement of the same kind with no parameter markers.

use crate::classifier::classify_statement;
use crate::error::GateError;
use crate::params::ParameterGuard;
use crate::parser::{SqlAnalyzer, StatementTree};
use sqlgate_core::OperationKind;

/// Render a validated statement back to SQL text.
pub fn render(tree: &StatementTree, kind: OperationKind) -> Result<String, GateError> {
    let rendered = tree.statement().to_string();
    let dialect = tree.dialect();
    let fault = |reason: String| GateError::SerializationFault {
        dialect,
        rendered: rendered.clone(),
        reason,
    };

    let reparsed = SqlAnalyzer::new(dialect)
        .parse_one(&rendered)
        .map_err(|e| fault(format!("rendering does not re-parse: {}", e)))?;

    let reparsed_kind = classify_statement(reparsed.statement());
    if reparsed_kind != kind {
        return Err(fault(format!(
            "rendering classifies as {} instead of {}",
            reparsed_kind, kind
        )));
    }

    if let Some(marker) = ParameterGuard::new().find_markers(&reparsed).first() {
        return Err(fault(format!(
            "rendering introduced {} marker `{}`",
            marker.kind, marker.token
        )));
    }

    tracing::debug!(dialect = %dialect, sql = %rendered, "Rendered canonical statement");
    Ok(rendered)
}
