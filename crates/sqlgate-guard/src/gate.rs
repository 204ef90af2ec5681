//! The validation pipeline.
//!
//! ```text
//! text ─► parse ─► parameter guard ─► classify ─► route ─► render ─► canonical SQL
//! ```
//!
//! Each stage fails fast, so a syntax error wins over a parameter marker and a
//! parameter marker wins over a disallowed operation.

use crate::classifier::classify;
use crate::error::GateError;
use crate::params::{ParameterGuard, ParameterMarker};
use crate::parser::SqlAnalyzer;
use crate::render::render;
use crate::router::authorize;
use serde::Serialize;
use sqlgate_core::{EntryPointMode, OperationKind, SqlDialect};

/// A statement accepted for execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedStatement {
    pub operation: OperationKind,
    /// The text to execute. Never the caller's raw text.
    pub canonical_sql: String,
}

/// Result of gating one statement.
pub type ValidationOutcome = Result<ValidatedStatement, GateError>;

/// Diagnostic view of a statement, computed without an entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inspection {
    pub operation: OperationKind,
    /// All parameter markers in traversal order.
    pub markers: Vec<ParameterMarker>,
}

/// Validates statements for one dialect.
///
/// Holds no mutable state; share it freely between tasks.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatementGate {
    analyzer: SqlAnalyzer,
    guard: ParameterGuard,
}

impl StatementGate {
    pub fn new(dialect: SqlDialect) -> Self {
        Self {
            analyzer: SqlAnalyzer::new(dialect),
            guard: ParameterGuard::new(),
        }
    }

    pub fn dialect(&self) -> SqlDialect {
        self.analyzer.dialect()
    }

    /// Run the full pipeline for a statement arriving through `mode`.
    pub fn validate(&self, sql: &str, mode: EntryPointMode) -> ValidationOutcome {
        let tree = self.analyzer.parse_one(sql)?;
        self.guard.check(&tree)?;
        let operation = classify(&tree);
        authorize(mode, operation)?;
        let canonical_sql = render(&tree, operation)?;

        Ok(ValidatedStatement {
            operation,
            canonical_sql,
        })
    }

    /// Parse and report kind and markers without judging them.
    pub fn inspect(&self, sql: &str) -> Result<Inspection, GateError> {
        let tree = self.analyzer.parse_one(sql)?;
        Ok(Inspection {
            operation: classify(&tree),
            markers: self.guard.find_markers(&tree),
        })
    }
}
