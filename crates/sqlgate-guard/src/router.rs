//! Entry-point routing.

use crate::error::GateError;
use sqlgate_core::{EntryPointMode, OperationKind};

/// Accept `kind` through `mode` or explain which kinds that entry point takes.
///
/// Must only run on statements the parameter guard already accepted.
pub fn authorize(mode: EntryPointMode, kind: OperationKind) -> Result<(), GateError> {
    if mode.permits(kind) {
        return Ok(());
    }

    tracing::debug!(mode = %mode, operation = %kind, "Operation not permitted for entry point");
    Err(GateError::OperationNotPermitted {
        mode,
        found: kind,
        permitted: mode.permitted().to_vec(),
    })
}
