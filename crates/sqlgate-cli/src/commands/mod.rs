//! CLI command implementations for SQL Gate.

pub mod check;
pub mod credentials;
pub mod tools;

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::PathBuf;
use std::process::ExitCode;

/// What a command prints, and whether it counts as success.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub ok: bool,
    pub body: Value,
}

impl Report {
    pub fn success(body: Value) -> Self {
        Self { ok: true, body }
    }

    pub fn failure(body: Value) -> Self {
        Self { ok: false, body }
    }

    /// Print the body as JSON on stdout and map `ok` to the exit code.
    pub fn emit(&self) -> Result<ExitCode> {
        println!("{}", serde_json::to_string_pretty(&self.body)?);
        Ok(if self.ok {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        })
    }
}

/// SQL text from the argument, a file, or stdin, in that order.
pub fn read_sql(sql: Option<String>, file: Option<PathBuf>) -> Result<String> {
    if let Some(sql) = sql {
        return Ok(sql);
    }
    if let Some(path) = file {
        return std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read SQL file: {:?}", path));
    }
    std::io::read_to_string(std::io::stdin()).context("Failed to read SQL from stdin")
}
