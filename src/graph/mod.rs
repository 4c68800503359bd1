/*!
 * Process Graph
 * Dependency relations between simulated processes (adjacency lists)
 */

use crate::core::limits::MAX_PROCESSES;
use crate::core::types::Pid;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Graph operation result
pub type GraphResult<T> = Result<T, GraphError>;

/// Graph errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum GraphError {
    #[error("PID {pid} is outside the graph range 0..{max}")]
    #[diagnostic(
        code(graph::pid_out_of_range),
        help("Relations can only be recorded between PIDs below the process limit.")
    )]
    PidOutOfRange { pid: Pid, max: usize },
}

/// Directed "depends on" relations, one adjacency list per PID slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessGraph {
    adjacency: Vec<Vec<Pid>>,
}

impl ProcessGraph {
    pub fn new() -> Self {
        Self {
            adjacency: vec![Vec::new(); MAX_PROCESSES],
        }
    }

    /// Rebuild from persisted edges, skipping any outside the PID range
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (Pid, Pid)>,
    {
        let mut graph = Self::new();
        for (from, to) in edges {
            if let Err(e) = graph.add_edge(from, to) {
                warn!(from, to, error = %e, "Skipping persisted relation");
            }
        }
        graph
    }

    /// Record that `from` depends on `to`
    pub fn add_edge(&mut self, from: Pid, to: Pid) -> GraphResult<()> {
        let slot = Self::slot(from)?;
        Self::slot(to)?;
        self.adjacency[slot].push(to);
        debug!(from, to, "Added process relation");
        Ok(())
    }

    /// Processes `pid` depends on, in insertion order
    pub fn dependencies(&self, pid: Pid) -> &[Pid] {
        Self::slot(pid)
            .map(|slot| self.adjacency[slot].as_slice())
            .unwrap_or(&[])
    }

    /// Every edge, by source PID then insertion order
    pub fn edges(&self) -> impl Iterator<Item = (Pid, Pid)> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(from, targets)| targets.iter().map(move |&to| (from as Pid, to)))
    }

    /// PIDs with at least one dependency, ascending
    pub fn sources(&self) -> impl Iterator<Item = Pid> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .filter(|(_, targets)| !targets.is_empty())
            .map(|(from, _)| from as Pid)
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.edge_count() == 0
    }

    pub fn clear(&mut self) {
        self.adjacency.iter_mut().for_each(Vec::clear);
    }

    fn slot(pid: Pid) -> GraphResult<usize> {
        usize::try_from(pid)
            .ok()
            .filter(|&slot| slot < MAX_PROCESSES)
            .ok_or(GraphError::PidOutOfRange {
                pid,
                max: MAX_PROCESSES,
            })
    }
}

impl Default for ProcessGraph {
    fn default() -> Self {
        Self::new()
    }
}
