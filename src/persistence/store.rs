/*!
 * Snapshot Store
 * Loads and saves heap and graph snapshot files
 */

use super::codec;
use super::{PersistenceError, PersistenceResult};
use crate::core::config::HeapConfig;
use crate::core::types::Pid;
use crate::memory::BlockRecord;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File-backed snapshot storage
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    heap_path: PathBuf,
    graph_path: PathBuf,
}

impl SnapshotStore {
    pub fn new(heap_path: impl Into<PathBuf>, graph_path: impl Into<PathBuf>) -> Self {
        Self {
            heap_path: heap_path.into(),
            graph_path: graph_path.into(),
        }
    }

    pub fn from_config(config: &HeapConfig) -> Self {
        Self::new(&config.heap_file, &config.graph_file)
    }

    pub fn heap_path(&self) -> &Path {
        &self.heap_path
    }

    pub fn graph_path(&self) -> &Path {
        &self.graph_path
    }

    /// Load heap records; `None` when there is no prior state
    pub fn load_heap(&self) -> PersistenceResult<Option<Vec<BlockRecord>>> {
        match read_optional(&self.heap_path)? {
            Some(bytes) => {
                let records = codec::decode_blocks(&bytes)?;
                debug!(path = %self.heap_path.display(), blocks = records.len(), "Loaded heap snapshot");
                Ok(Some(records))
            }
            None => Ok(None),
        }
    }

    pub fn save_heap(&self, records: &[BlockRecord]) -> PersistenceResult<()> {
        let bytes = codec::encode_blocks(records)?;
        write_atomic(&self.heap_path, &bytes)?;
        debug!(path = %self.heap_path.display(), blocks = records.len(), "Saved heap snapshot");
        Ok(())
    }

    /// Load graph edges; `None` when there is no prior state
    pub fn load_graph(&self) -> PersistenceResult<Option<Vec<(Pid, Pid)>>> {
        match read_optional(&self.graph_path)? {
            Some(bytes) => Ok(Some(codec::decode_edges(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn save_graph<I>(&self, edges: I) -> PersistenceResult<()>
    where
        I: IntoIterator<Item = (Pid, Pid)>,
    {
        let bytes = codec::encode_edges(edges)?;
        write_atomic(&self.graph_path, &bytes)
    }

    /// Empty both snapshot files
    pub fn truncate(&self) -> PersistenceResult<()> {
        write_atomic(&self.heap_path, &[])?;
        write_atomic(&self.graph_path, &[])?;
        info!(
            heap = %self.heap_path.display(),
            graph = %self.graph_path.display(),
            "Truncated snapshot files"
        );
        Ok(())
    }
}

/// Read a file, mapping "missing" and "empty" to `None`
fn read_optional(path: &Path) -> PersistenceResult<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) if bytes.is_empty() => Ok(None),
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(PersistenceError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Write through a sibling temp file and rename over the target
fn write_atomic(path: &Path, bytes: &[u8]) -> PersistenceResult<()> {
    let io_err = |source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, bytes).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)
}
