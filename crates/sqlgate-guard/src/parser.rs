//! SQL parsing.

use crate::error::GateError;
use sqlgate_core::SqlDialect;
use sqlparser::ast::Statement;
use sqlparser::dialect::{
    AnsiDialect, BigQueryDialect, ClickHouseDialect, Dialect, DuckDbDialect, GenericDialect,
    MsSqlDialect, MySqlDialect, PostgreSqlDialect, SQLiteDialect, SnowflakeDialect,
};
use sqlparser::parser::Parser;

/// The `sqlparser` grammar for a configured dialect.
pub fn parser_dialect(dialect: SqlDialect) -> Box<dyn Dialect> {
    match dialect {
        SqlDialect::BigQuery => Box::new(BigQueryDialect {}),
        SqlDialect::Postgres => Box::new(PostgreSqlDialect {}),
        SqlDialect::MySql => Box::new(MySqlDialect {}),
        SqlDialect::Sqlite => Box::new(SQLiteDialect {}),
        SqlDialect::Snowflake => Box::new(SnowflakeDialect {}),
        SqlDialect::DuckDb => Box::new(DuckDbDialect {}),
        SqlDialect::ClickHouse => Box::new(ClickHouseDialect {}),
        SqlDialect::MsSql => Box::new(MsSqlDialect {}),
        SqlDialect::Ansi => Box::new(AnsiDialect {}),
        SqlDialect::Generic => Box::new(GenericDialect {}),
    }
}

/// One parsed statement and the dialect it was parsed in.
///
/// Read-only once built; the guard, classifier and renderer all borrow it.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementTree {
    statement: Statement,
    dialect: SqlDialect,
}

impl StatementTree {
    /// The root statement node.
    pub fn statement(&self) -> &Statement {
        &self.statement
    }

    /// The dialect the statement was parsed with.
    pub fn dialect(&self) -> SqlDialect {
        self.dialect
    }
}

/// Parses SQL text for a fixed dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlAnalyzer {
    dialect: SqlDialect,
}

impl SqlAnalyzer {
    /// Create a new SQL analyzer for the given dialect.
    pub fn new(dialect: SqlDialect) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> SqlDialect {
        self.dialect
    }

    /// Parse a SQL string into statements.
    pub fn parse(&self, sql: &str) -> Result<Vec<Statement>, GateError> {
        let dialect = parser_dialect(self.dialect);
        Parser::parse_sql(dialect.as_ref(), sql).map_err(|e| GateError::Syntax {
            query: sql.to_string(),
            cause: e.to_string(),
        })
    }

    /// Parse text that must hold exactly one statement.
    ///
    /// Empty text is [`GateError::EmptyQuery`]; text with no statement (only
    /// comments or semicolons) or with several is a syntax error.
    pub fn parse_one(&self, sql: &str) -> Result<StatementTree, GateError> {
        if sql.trim().is_empty() {
            return Err(GateError::EmptyQuery);
        }

        let mut statements = self.parse(sql)?;
        if statements.len() != 1 {
            return Err(GateError::Syntax {
                query: sql.to_string(),
                cause: format!("expected exactly one statement, found {}", statements.len()),
            });
        }

        let statement = statements.remove(0);
        Ok(StatementTree {
            statement,
            dialect: self.dialect,
        })
    }
}
