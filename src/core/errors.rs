/*!
 * Error Types
 * Centralized error handling with thiserror and miette
 */

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

// Re-export subsystem errors
pub use crate::cli::CliError;
pub use crate::graph::GraphError;
pub use crate::memory::HeapError;
pub use crate::persistence::PersistenceError;

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?}")]
    #[diagnostic(
        code(config::invalid_value),
        help("Capacities must be positive integers; flags accept 1/0/true/false.")
    )]
    InvalidValue { var: String, value: String },

    #[error("Heap and graph snapshots cannot share the path {0}")]
    #[diagnostic(
        code(config::conflicting_paths),
        help("Point HEAPSIM_HEAP_FILE and HEAPSIM_GRAPH_FILE at different files.")
    )]
    ConflictingPaths(PathBuf),
}

/// Top-level error for a simulator session
#[derive(Error, Debug, Diagnostic)]
pub enum SimError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Heap(#[from] HeapError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Cli(#[from] CliError),
}

/// Common result type for session operations
pub type SimResult<T> = Result<T, SimError>;
