/*!
 * Simulator Configuration
 *
 * Runtime configuration assembled from defaults and environment overrides.
 *
 * Environment variables:
 * - HEAPSIM_TOTAL_MEMORY: heap capacity in units (default: 1024)
 * - HEAPSIM_STATE_DIR: directory holding snapshot files (default: <tmp>/heapsim-state)
 * - HEAPSIM_HEAP_FILE: heap snapshot path (default: <state dir>/heap_state.dat)
 * - HEAPSIM_GRAPH_FILE: graph snapshot path (default: <state dir>/graph_state.dat)
 * - HEAPSIM_TRACE_JSON: enable JSON log output (default: false)
 * - HEAPSIM_LOG: default log filter when RUST_LOG is unset (default: warn)
 */

use super::errors::ConfigError;
use super::limits::{
    DEFAULT_GRAPH_FILE, DEFAULT_HEAP_FILE, DEFAULT_LOG_FILTER, DEFAULT_STATE_DIR,
    DEFAULT_TOTAL_MEMORY,
};
use super::types::Size;
use std::path::PathBuf;

pub const ENV_TOTAL_MEMORY: &str = "HEAPSIM_TOTAL_MEMORY";
pub const ENV_STATE_DIR: &str = "HEAPSIM_STATE_DIR";
pub const ENV_HEAP_FILE: &str = "HEAPSIM_HEAP_FILE";
pub const ENV_GRAPH_FILE: &str = "HEAPSIM_GRAPH_FILE";
pub const ENV_TRACE_JSON: &str = "HEAPSIM_TRACE_JSON";
pub const ENV_LOG: &str = "HEAPSIM_LOG";

/// Simulator configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeapConfig {
    /// Total capacity of the simulated heap
    pub total_memory: Size,
    /// Heap snapshot file
    pub heap_file: PathBuf,
    /// Process graph snapshot file
    pub graph_file: PathBuf,
    /// Emit JSON-formatted logs
    pub trace_json: bool,
    /// Default log filter
    pub log_filter: String,
}

impl Default for HeapConfig {
    fn default() -> Self {
        Self::in_dir(std::env::temp_dir().join(DEFAULT_STATE_DIR))
    }
}

impl HeapConfig {
    /// Default configuration with snapshot files placed in `dir`
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            total_memory: DEFAULT_TOTAL_MEMORY,
            heap_file: dir.join(DEFAULT_HEAP_FILE),
            graph_file: dir.join(DEFAULT_GRAPH_FILE),
            trace_json: false,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }

    pub fn with_total_memory(mut self, total_memory: Size) -> Self {
        self.total_memory = total_memory;
        self
    }

    /// Build configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(ENV_STATE_DIR) {
            Some(dir) => Self::in_dir(dir),
            None => Self::default(),
        };

        if let Some(raw) = lookup(ENV_TOTAL_MEMORY) {
            config.total_memory = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                var: ENV_TOTAL_MEMORY.to_string(),
                value: raw.clone(),
            })?;
        }
        if let Some(path) = lookup(ENV_HEAP_FILE) {
            config.heap_file = PathBuf::from(path);
        }
        if let Some(path) = lookup(ENV_GRAPH_FILE) {
            config.graph_file = PathBuf::from(path);
        }
        if let Some(raw) = lookup(ENV_TRACE_JSON) {
            config.trace_json = parse_flag(ENV_TRACE_JSON, &raw)?;
        }
        if let Some(filter) = lookup(ENV_LOG) {
            config.log_filter = filter;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_memory == 0 {
            return Err(ConfigError::InvalidValue {
                var: ENV_TOTAL_MEMORY.to_string(),
                value: "0".to_string(),
            });
        }
        if self.heap_file == self.graph_file {
            return Err(ConfigError::ConflictingPaths(self.heap_file.clone()));
        }
        Ok(())
    }
}

fn parse_flag(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var: var.to_string(),
            value: raw.to_string(),
        }),
    }
}
