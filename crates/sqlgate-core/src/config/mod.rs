//! Configuration types for SQL Gate.
//!
//! A deployment is configured by a single YAML file (`sqlgate.yaml`) that fixes
//! the SQL dialect, the execution job settings and the service account used by
//! the execution client.
//!
//! ```yaml
//! dialect: bigquery
//! log_level: info
//! execution:
//!   maximum_bytes_billed: 10000000000
//! credentials:
//!   service_account_file: ./service-account.json
//!   project_id: analytics-prod
//! ```

pub mod credentials;
pub mod execution;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::SqlDialect;

pub use credentials::{CredentialsConfig, CredentialsError, ServiceAccountConfig};
pub use execution::ExecutionConfig;

/// Complete SQL Gate configuration loaded from a file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GateConfig {
    /// Dialect statements are parsed and rendered in.
    #[serde(default)]
    pub dialect: SqlDialect,

    /// Log filter directive (e.g. `info`, `sqlgate_guard=debug`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// Execution job settings.
    #[serde(default)]
    pub execution: ExecutionConfig,

    /// Service account credentials for the execution client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<CredentialsConfig>,
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl GateConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }

    /// Load configuration and resolve paths relative to the file's directory.
    pub fn load_with_context(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut config = Self::from_file(path)?;

        let base_dir = path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        if let Some(credentials) = config.credentials.as_mut()
            && let Some(file) = &credentials.service_account_file
            && file.is_relative()
        {
            credentials.service_account_file = Some(base_dir.join(file));
        }

        Ok(config)
    }

    /// Resolve the service account, failing if no credentials are configured.
    pub fn resolve_credentials(&self) -> Result<ServiceAccountConfig, CredentialsError> {
        self.credentials
            .as_ref()
            .ok_or(CredentialsError::MissingServiceAccountJson)?
            .resolve()
    }
}
