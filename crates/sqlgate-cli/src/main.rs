mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use sqlgate_core::{EntryPointMode, GateConfig, SqlDialect};
use sqlgate_guard::StatementGate;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Config file picked up from the working directory when `--config` is absent.
const DEFAULT_CONFIG_FILE: &str = "sqlgate.yaml";

#[derive(Parser, Debug)]
#[command(
    name = "sqlgate",
    version,
    about = "Validate SQL statements before they reach the warehouse"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, short = 'c', global = true, env = "SQLGATE_CONFIG")]
    config: Option<PathBuf>,

    /// Log filter directive (e.g. "debug", "sqlgate_guard=trace")
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full gate for one entry point and print the canonical statement.
    Check {
        /// Entry point the statement arrives through
        #[arg(long, value_enum)]
        mode: Mode,

        /// SQL dialect (overrides the config file)
        #[arg(long)]
        dialect: Option<SqlDialect>,

        /// SQL text. Read from --file or stdin when omitted.
        sql: Option<String>,

        /// File containing the SQL text
        #[arg(long, conflicts_with = "sql")]
        file: Option<PathBuf>,
    },

    /// Parse a statement and report its operation and parameter markers.
    Inspect {
        /// SQL dialect (overrides the config file)
        #[arg(long)]
        dialect: Option<SqlDialect>,

        /// SQL text. Read from --file or stdin when omitted.
        sql: Option<String>,

        /// File containing the SQL text
        #[arg(long, conflicts_with = "sql")]
        file: Option<PathBuf>,
    },

    /// Resolve the configured service account credentials (offline).
    Credentials,

    /// List the query and mutation tool definitions.
    Tools {
        /// SQL dialect (overrides the config file)
        #[arg(long)]
        dialect: Option<SqlDialect>,

        /// Include input schemas
        #[arg(long, short = 'v', default_value_t = false)]
        verbose: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Query,
    Mutation,
}

impl From<Mode> for EntryPointMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Query => EntryPointMode::QueryOnly,
            Mode::Mutation => EntryPointMode::MutationOnly,
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    init_tracing(cli.log_level.as_deref(), config.log_level.as_deref());

    let report = match cli.cmd {
        Command::Check {
            mode,
            dialect,
            sql,
            file,
        } => {
            let sql = commands::read_sql(sql, file)?;
            let gate = StatementGate::new(dialect.unwrap_or(config.dialect));
            commands::check::check(&gate, &sql, mode.into())
        }

        Command::Inspect { dialect, sql, file } => {
            let sql = commands::read_sql(sql, file)?;
            let gate = StatementGate::new(dialect.unwrap_or(config.dialect));
            commands::check::inspect(&gate, &sql)
        }

        Command::Credentials => commands::credentials::resolve(&config),

        Command::Tools { dialect, verbose } => {
            commands::tools::list(dialect.unwrap_or(config.dialect), verbose)?
        }
    };

    report.emit()
}

/// Load the given config file, or `sqlgate.yaml` if present, or defaults.
fn load_config(path: Option<&Path>) -> Result<GateConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !fallback.exists() {
                return Ok(GateConfig::default());
            }
            fallback
        }
    };

    GateConfig::load_with_context(&path)
        .with_context(|| format!("Failed to load configuration from {:?}", path))
}

/// `--log-level` wins, then `RUST_LOG`, then the config file, then `info`.
fn log_filter(flag: Option<&str>, configured: Option<&str>) -> EnvFilter {
    if let Some(directive) = flag {
        return EnvFilter::new(directive);
    }
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(configured.unwrap_or("info")))
}

fn init_tracing(flag: Option<&str>, configured: Option<&str>) {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(flag, configured))
        .with_writer(std::io::stderr)
        .init();
}
