//! Session configuration.
//!
//! Loaded from JSON; every field is optional:
//!
//! ```json
//! {
//!   "log_filter": "easel_wire=trace",
//!   "ops": { "fill_path": "op_dt_fill" }
//! }
//! ```

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use easel_wire::OpNames;

use crate::logging::LoggingConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EaselConfig {
    /// `env_logger` filter; `RUST_LOG` is consulted when absent.
    pub log_filter: Option<String>,
    /// Engine-side operation names to bind.
    pub ops: OpNames,
}

impl EaselConfig {
    pub fn from_json_str(src: &str) -> anyhow::Result<Self> {
        serde_json::from_str(src).context("invalid easel config")
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_json_str(&src).with_context(|| format!("in {}", path.display()))
    }

    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig {
            env_filter: self.log_filter.clone(),
            ..LoggingConfig::default()
        }
    }
}
