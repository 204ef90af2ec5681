//! Service account credential configuration.
//!
//! The execution client authenticates with a cloud service account. Its JSON key
//! can be supplied three ways (in order of precedence):
//! 1. `service_account_json_env` - an environment variable holding the JSON
//! 2. `service_account_json` - the JSON inline
//! 3. `service_account_file` - a path to the JSON key file

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::PathBuf;

/// Fields every service account key must carry.
pub const REQUIRED_FIELDS: [&str; 5] = [
    "type",
    "project_id",
    "private_key_id",
    "private_key",
    "client_email",
];

/// Errors raised while resolving credentials.
#[derive(Debug, thiserror::Error)]
pub enum CredentialsError {
    #[error("service_account_json is required")]
    MissingServiceAccountJson,

    #[error("Invalid JSON in service_account_json: {0}")]
    InvalidJson(String),

    #[error("Missing required fields in service account JSON: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("The JSON must be a service_account type")]
    NotServiceAccount,

    #[error("project_id is required either in credentials or service account JSON")]
    MissingProjectId,

    #[error("failed to read service account file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Credential settings as written in `sqlgate.yaml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Environment variable holding the service account JSON.
    /// Highest precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_account_json_env: Option<String>,

    /// Service account JSON inline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_account_json: Option<String>,

    /// Path to the service account key file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_account_file: Option<PathBuf>,

    /// Project to bill and run jobs in. Overrides the key's `project_id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
}

impl CredentialsConfig {
    /// Look up the raw service account JSON following the documented precedence.
    pub fn service_account_json(&self) -> Result<Option<String>, CredentialsError> {
        if let Some(env_var) = &self.service_account_json_env
            && let Ok(json) = std::env::var(env_var)
        {
            return Ok(Some(json));
        }

        if let Some(json) = &self.service_account_json {
            return Ok(Some(json.clone()));
        }

        if let Some(path) = &self.service_account_file {
            let json = std::fs::read_to_string(path).map_err(|source| CredentialsError::Io {
                path: path.clone(),
                source,
            })?;
            return Ok(Some(json));
        }

        Ok(None)
    }

    /// Resolve and validate into a [`ServiceAccountConfig`].
    pub fn resolve(&self) -> Result<ServiceAccountConfig, CredentialsError> {
        let json = self.service_account_json()?;
        ServiceAccountConfig::from_parts(json.as_deref(), self.project_id.as_deref())
    }
}

/// Validated service account material plus the project jobs run in.
#[derive(Clone, PartialEq)]
pub struct ServiceAccountConfig {
    /// The parsed service account key.
    pub service_account_info: Map<String, Value>,
    /// Effective project id.
    pub project_id: String,
}

impl ServiceAccountConfig {
    /// Build from a raw credentials map with `service_account_json` and an
    /// optional `project_id` key, the shape tool hosts hand over.
    pub fn from_credentials(credentials: &Map<String, Value>) -> Result<Self, CredentialsError> {
        let json = credentials
            .get("service_account_json")
            .and_then(Value::as_str);
        let project_id = credentials.get("project_id").and_then(Value::as_str);
        Self::from_parts(json, project_id)
    }

    /// Validate a service account JSON string and apply the project override.
    pub fn from_parts(
        service_account_json: Option<&str>,
        project_id: Option<&str>,
    ) -> Result<Self, CredentialsError> {
        let json = service_account_json
            .filter(|s| !s.is_empty())
            .ok_or(CredentialsError::MissingServiceAccountJson)?;

        let parsed: Value =
            serde_json::from_str(json).map_err(|e| CredentialsError::InvalidJson(e.to_string()))?;
        let Value::Object(info) = parsed else {
            return Err(CredentialsError::InvalidJson(
                "expected a JSON object".to_string(),
            ));
        };

        let missing: Vec<String> = REQUIRED_FIELDS
            .iter()
            .filter(|field| !info.contains_key(**field))
            .map(|field| field.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(CredentialsError::MissingFields(missing));
        }

        if info.get("type").and_then(Value::as_str) != Some("service_account") {
            return Err(CredentialsError::NotServiceAccount);
        }

        let project_id = project_id
            .filter(|p| !p.is_empty())
            .or_else(|| {
                info.get("project_id")
                    .and_then(Value::as_str)
                    .filter(|p| !p.is_empty())
            })
            .map(str::to_string)
            .ok_or(CredentialsError::MissingProjectId)?;

        Ok(Self {
            service_account_info: info,
            project_id,
        })
    }

    /// The service account's email, if present as a string.
    pub fn client_email(&self) -> Option<&str> {
        self.service_account_info
            .get("client_email")
            .and_then(Value::as_str)
    }
}

// Keeps the private key out of logs.
impl fmt::Debug for ServiceAccountConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountConfig")
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email())
            .finish_non_exhaustive()
    }
}
