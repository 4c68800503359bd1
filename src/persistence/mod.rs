/*!
 * Persistence Module
 * Heap and process-graph snapshots on disk
 */

pub mod codec;
pub mod store;

pub use store::SnapshotStore;

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Persistence operation result
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Snapshot I/O and codec errors
#[derive(Error, Debug, Diagnostic)]
pub enum PersistenceError {
    #[error("I/O error on {path}: {source}")]
    #[diagnostic(
        code(persistence::io),
        help("Check that the state directory exists and is writable.")
    )]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Snapshot of {len} bytes is not a whole number of {record_size}-byte records")]
    #[diagnostic(
        code(persistence::truncated),
        help("The file was cut short; run `logout` to start from a fresh heap.")
    )]
    Truncated { len: usize, record_size: usize },

    #[error("Encoding error: {0}")]
    #[diagnostic(code(persistence::encode))]
    Encode(String),

    #[error("Decoding error: {0}")]
    #[diagnostic(code(persistence::decode))]
    Decode(String),
}
