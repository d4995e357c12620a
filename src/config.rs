use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::costs::CommandCosts;
use crate::error::ConfigError;

/// Environment variable naming a JSON file with a [`SamplingConfig`].
pub const CONFIG_ENV: &str = "SURVEYOR_CONFIG";

/// Tunables for the sampling workflow. Every field has a default, so a
/// config file only needs the keys it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Delay after the radioactive warning is accepted.
    pub radioactive_delay_ms: u64,
    /// Delay after the gamble list is answered.
    pub gamble_delay_ms: u64,
    /// Delay after a node offer is ignored.
    pub node_ignore_delay_ms: u64,
    /// Upper bound of the random node offset on each axis (lower bound is 1).
    pub node_offset_max: u32,
    pub gamble_cost_multiplier: i32,
    pub waypoint_name: String,
    /// Costs served until the command table has loaded.
    pub fallback_costs: CommandCosts,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            radioactive_delay_ms: 4000,
            gamble_delay_ms: 1000,
            node_ignore_delay_ms: 10_000,
            node_offset_max: 50,
            gamble_cost_multiplier: 2,
            waypoint_name: "Resource Node".to_string(),
            fallback_costs: CommandCosts::default(),
        }
    }
}

impl SamplingConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads from `$SURVEYOR_CONFIG` when set, defaults otherwise.
    pub fn from_env() -> anyhow::Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(&path).with_context(|| format!("loading {CONFIG_ENV}")),
            None => Ok(Self::default()),
        }
    }

    pub fn radioactive_delay(&self) -> Duration {
        Duration::from_millis(self.radioactive_delay_ms)
    }

    pub fn gamble_delay(&self) -> Duration {
        Duration::from_millis(self.gamble_delay_ms)
    }

    pub fn node_ignore_delay(&self) -> Duration {
        Duration::from_millis(self.node_ignore_delay_ms)
    }
}
