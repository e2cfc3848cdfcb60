//! Run parameters: built-in defaults, then an optional JSON file, then CLI flags.

use anyhow::{Context, Result};
use contention::CounterConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Worker threads per workload.
    pub threads: usize,
    /// Increments each worker performs.
    pub count: usize,
    /// Slot bound for the counter bank; `null` for unbounded.
    pub max_workers: Option<usize>,
    /// Keys each worker appends in the list workload.
    pub keys_per_worker: usize,
    /// Print every key during list traversal.
    pub print_keys: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            threads: 4,
            count: 1_000_000,
            max_workers: CounterConfig::default().max_capacity,
            keys_per_worker: 1_000,
            print_keys: false,
        }
    }
}

impl HarnessConfig {
    /// Reads `path` if given, otherwise returns the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    pub fn counter_config(&self) -> CounterConfig {
        CounterConfig {
            capacity: self.threads,
            max_capacity: self.max_workers,
        }
    }
}
