//! Execution job configuration.
//!
//! Settings handed to the execution client with every job. The client is built
//! per invocation, so there are no pool or connection settings here.

use serde::{Deserialize, Serialize};

/// Configuration applied to every execution job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Upper bound on bytes a single job may bill before the engine aborts it.
    #[serde(default = "default_maximum_bytes_billed")]
    pub maximum_bytes_billed: u64,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            maximum_bytes_billed: default_maximum_bytes_billed(),
        }
    }
}

/// 10 GB.
fn default_maximum_bytes_billed() -> u64 {
    10_000_000_000
}
