//! # sqlgate-core
//!
//! Types shared across the SQL Gate crates: the SQL dialect identifier, the
//! operation kinds a statement can classify to, the entry-point modes that gate
//! them, and the workspace configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Configuration types shared across all SQL Gate crates
pub mod config;

pub use config::{
    ConfigError, CredentialsConfig, CredentialsError, ExecutionConfig, GateConfig,
    ServiceAccountConfig,
};

/// SQL grammar used to parse and render statements.
///
/// Fixed once per deployment. BigQuery is the default because it is the
/// execution engine the tools talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SqlDialect {
    #[default]
    BigQuery,
    Postgres,
    MySql,
    Sqlite,
    Snowflake,
    DuckDb,
    ClickHouse,
    MsSql,
    Ansi,
    Generic,
}

impl SqlDialect {
    /// All supported dialects, in display order.
    pub const ALL: [SqlDialect; 10] = [
        SqlDialect::BigQuery,
        SqlDialect::Postgres,
        SqlDialect::MySql,
        SqlDialect::Sqlite,
        SqlDialect::Snowflake,
        SqlDialect::DuckDb,
        SqlDialect::ClickHouse,
        SqlDialect::MsSql,
        SqlDialect::Ansi,
        SqlDialect::Generic,
    ];

    /// Configuration identifier of this dialect.
    pub fn as_str(&self) -> &'static str {
        match self {
            SqlDialect::BigQuery => "bigquery",
            SqlDialect::Postgres => "postgres",
            SqlDialect::MySql => "mysql",
            SqlDialect::Sqlite => "sqlite",
            SqlDialect::Snowflake => "snowflake",
            SqlDialect::DuckDb => "duckdb",
            SqlDialect::ClickHouse => "clickhouse",
            SqlDialect::MsSql => "mssql",
            SqlDialect::Ansi => "ansi",
            SqlDialect::Generic => "generic",
        }
    }
}

impl fmt::Display for SqlDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SqlDialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "postgresql" => return Ok(SqlDialect::Postgres),
            "sqlserver" => return Ok(SqlDialect::MsSql),
            _ => {}
        }
        SqlDialect::ALL
            .into_iter()
            .find(|d| d.as_str() == normalized)
            .ok_or_else(|| {
                let known: Vec<&str> = SqlDialect::ALL.iter().map(|d| d.as_str()).collect();
                format!(
                    "unknown SQL dialect '{}', expected one of: {}",
                    s,
                    known.join(", ")
                )
            })
    }
}

/// The operation a single statement performs, judged by its outermost node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperationKind {
    Select,
    Insert,
    Update,
    Delete,
    Other,
}

impl OperationKind {
    /// Whether this kind writes data.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            OperationKind::Insert | OperationKind::Update | OperationKind::Delete
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Select => "SELECT",
            OperationKind::Insert => "INSERT",
            OperationKind::Update => "UPDATE",
            OperationKind::Delete => "DELETE",
            OperationKind::Other => "OTHER",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Restriction declared by the entry point a statement arrives through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryPointMode {
    /// Read statements only.
    QueryOnly,
    /// INSERT, UPDATE and DELETE only.
    MutationOnly,
}

impl EntryPointMode {
    /// Operation kinds this entry point lets through.
    pub fn permitted(&self) -> &'static [OperationKind] {
        match self {
            EntryPointMode::QueryOnly => &[OperationKind::Select],
            EntryPointMode::MutationOnly => &[
                OperationKind::Insert,
                OperationKind::Update,
                OperationKind::Delete,
            ],
        }
    }

    /// Check whether `kind` may run through this entry point.
    pub fn permits(&self, kind: OperationKind) -> bool {
        self.permitted().contains(&kind)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryPointMode::QueryOnly => "query",
            EntryPointMode::MutationOnly => "mutation",
        }
    }
}

impl fmt::Display for EntryPointMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Variant of a parameter marker found in a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    /// Unbound `?`-style marker with no name.
    Positional,
    /// Marker bound by name, e.g. `@id` or `:id`.
    Named,
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerKind::Positional => f.write_str("positional"),
            MarkerKind::Named => f.write_str("named"),
        }
    }
}
