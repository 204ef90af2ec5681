//! Error types for the guard crate.

use sqlgate_core::{EntryPointMode, MarkerKind, OperationKind, SqlDialect};
use thiserror::Error;

/// A parameter marker that the policy does not allow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyViolation {
    /// Which kind of marker was found.
    pub marker: MarkerKind,
    /// The marker as written, e.g. `?` or `@id`.
    pub token: String,
    /// Human-readable rejection.
    pub message: String,
}

impl PolicyViolation {
    /// Rejection for an unbound positional placeholder.
    pub fn positional(token: impl Into<String>) -> Self {
        let token = token.into();
        Self {
            marker: MarkerKind::Positional,
            message: format!(
                "Not allowed Placeholder -> `{}`, Should use named parameters if needed",
                token
            ),
            token,
        }
    }

    /// Rejection for a named parameter.
    pub fn named(token: impl Into<String>) -> Self {
        let token = token.into();
        Self {
            marker: MarkerKind::Named,
            message: format!("Parameters are not allowed: `{}`", token),
            token,
        }
    }
}

/// Errors that can occur while gating a statement.
#[derive(Debug, Error)]
pub enum GateError {
    /// No SQL text was supplied.
    #[error("SQL query is required")]
    EmptyQuery,

    /// The text does not parse as exactly one statement in the dialect.
    #[error("SQL syntax error, query={query}. caused by={cause}")]
    Syntax { query: String, cause: String },

    /// The statement carries a parameter marker.
    #[error("{}", .0.message)]
    PolicyViolation(PolicyViolation),

    /// The statement's operation is not allowed through this entry point.
    #[error("{}", not_permitted_message(.mode, .found))]
    OperationNotPermitted {
        mode: EntryPointMode,
        found: OperationKind,
        permitted: Vec<OperationKind>,
    },

    /// The parser's own rendering did not survive a re-parse.
    #[error("failed to render statement for dialect {dialect}: {reason} (rendered: {rendered})")]
    SerializationFault {
        dialect: SqlDialect,
        rendered: String,
        reason: String,
    },
}

impl GateError {
    /// Whether this error is a defect on our side rather than a rejected input.
    pub fn is_internal(&self) -> bool {
        matches!(self, GateError::SerializationFault { .. })
    }

    /// Stable identifier for the error class, for machine-readable reports.
    pub fn code(&self) -> &'static str {
        match self {
            GateError::EmptyQuery => "empty_query",
            GateError::Syntax { .. } => "syntax_error",
            GateError::PolicyViolation(_) => "parameter_not_allowed",
            GateError::OperationNotPermitted { .. } => "operation_not_permitted",
            GateError::SerializationFault { .. } => "serialization_fault",
        }
    }

    /// The marker kind, for policy violations.
    pub fn marker(&self) -> Option<MarkerKind> {
        match self {
            GateError::PolicyViolation(v) => Some(v.marker),
            _ => None,
        }
    }
}

impl From<PolicyViolation> for GateError {
    fn from(violation: PolicyViolation) -> Self {
        GateError::PolicyViolation(violation)
    }
}

fn not_permitted_message(mode: &EntryPointMode, found: &OperationKind) -> String {
    let permitted: Vec<&str> = mode.permitted().iter().map(|k| k.as_str()).collect();
    match mode {
        EntryPointMode::QueryOnly => format!(
            "Only {} operations are allowed in the query tool (found {})",
            permitted.join(", "),
            found
        ),
        EntryPointMode::MutationOnly => format!(
            "Only {} operations are allowed in the mutation tool (found {}). Use the query tool for SELECT operations.",
            permitted.join(", "),
            found
        ),
    }
}
