//! # sqlgate-guard
//!
//! Statement validation for SQL Gate.
//!
//! This crate provides functionality to:
//! - Parse SQL text into a single statement using `sqlparser`
//! - Reject statements carrying positional or named parameter markers
//! - Classify the statement's outermost operation
//! - Route the operation against the caller's entry point
//! - Render the validated statement back to canonical SQL
//!
//! ## Entry Points
//!
//! | Entry point | Permitted operations |
//! |-------------|----------------------|
//! | `QueryOnly` | `SELECT` |
//! | `MutationOnly` | `INSERT`, `UPDATE`, `DELETE` |
//!
//! ## Example
//!
//! ```
//! use sqlgate_core::{EntryPointMode, OperationKind, SqlDialect};
//! use sqlgate_guard::StatementGate;
//!
//! let gate = StatementGate::new(SqlDialect::BigQuery);
//! let ok = gate.validate("select 1", EntryPointMode::QueryOnly).unwrap();
//! assert_eq!(ok.operation, OperationKind::Select);
//! assert_eq!(ok.canonical_sql, "SELECT 1");
//!
//! assert!(gate.validate("SELECT * FROM t WHERE id = ?", EntryPointMode::QueryOnly).is_err());
//! ```

pub mod classifier;
pub mod error;
pub mod gate;
pub mod params;
pub mod parser;
pub mod render;
pub mod router;

pub use classifier::{classify, classify_statement};
pub use error::{GateError, PolicyViolation};
pub use gate::{Inspection, StatementGate, ValidatedStatement, ValidationOutcome};
pub use params::{ParameterGuard, ParameterMarker};
pub use parser::{SqlAnalyzer, StatementTree};
pub use router::authorize;
