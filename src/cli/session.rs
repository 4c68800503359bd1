/*!
 * Session
 * One invocation's view of the persisted heap and process graph
 *
 * Every invocation loads state from the snapshot files, runs a single
 * command, and writes state back when the command mutated it.
 */

use super::command::Command;
use super::render;
use crate::core::config::HeapConfig;
use crate::core::errors::SimResult;
use crate::graph::ProcessGraph;
use crate::memory::Heap;
use crate::monitoring::span_command;
use crate::persistence::{PersistenceError, SnapshotStore};
use tracing::{info, warn};

pub struct Session {
    heap: Heap,
    graph: ProcessGraph,
    store: SnapshotStore,
}

/// Rendered output plus the reason a command was refused, if it was
struct Outcome {
    output: String,
    failure: Option<String>,
}

impl Session {
    /// Load persisted state, falling back to a fresh heap when the
    /// snapshot is absent or unusable
    pub fn open(config: &HeapConfig) -> SimResult<Self> {
        let store = SnapshotStore::from_config(config);
        let mut heap = Heap::uninitialized(config.total_memory);

        match store.load_heap() {
            Ok(Some(records)) => {
                if let Err(e) = heap.restore(&records) {
                    warn!(path = %store.heap_path().display(), error = %e, "Discarding heap snapshot");
                }
            }
            Ok(None) => {}
            Err(e @ PersistenceError::Io { .. }) => return Err(e.into()),
            Err(e) => {
                warn!(path = %store.heap_path().display(), error = %e, "Unreadable heap snapshot");
            }
        }

        if heap.initialize_if_empty() {
            info!(total = config.total_memory, "Starting from a fresh heap");
        }

        let graph = match store.load_graph() {
            Ok(Some(edges)) => ProcessGraph::from_edges(edges),
            Ok(None) => ProcessGraph::new(),
            Err(e @ PersistenceError::Io { .. }) => return Err(e.into()),
            Err(e) => {
                warn!(path = %store.graph_path().display(), error = %e, "Unreadable graph snapshot");
                ProcessGraph::new()
            }
        };

        Ok(Self { heap, graph, store })
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn graph(&self) -> &ProcessGraph {
        &self.graph
    }

    /// Run one command and render its output
    ///
    /// Allocation and free failures are reported in the output rather
    /// than as errors; only persistence failures abort.
    pub fn execute(&mut self, command: &Command) -> SimResult<String> {
        let span = span_command(command.name());
        let _entered = span.enter();

        let result = self.run(command).and_then(|outcome| {
            if command.is_mutating() {
                self.persist(command)?;
            }
            Ok(outcome)
        });

        match result {
            Ok(Outcome { output, failure: None }) => {
                span.record_result(true);
                Ok(output)
            }
            Ok(Outcome {
                output,
                failure: Some(reason),
            }) => {
                span.record_error(&reason);
                Ok(output)
            }
            Err(e) => {
                span.record_error(&e.to_string());
                Err(e)
            }
        }
    }

    fn run(&mut self, command: &Command) -> SimResult<Outcome> {
        let mut out = String::new();
        let mut failure = None;

        match *command {
            Command::Allocate { size } => {
                match self.heap.allocate(size) {
                    Ok(pid) => out.push_str(&render::allocated(size, pid)),
                    Err(e) => {
                        failure = Some(e.to_string());
                        out.push_str(&format!("Allocation failed: {e}\n"));
                    }
                }
                out.push_str(&render::memory_table(&self.heap.snapshot()));
            }
            Command::Deallocate { pid } => {
                match self.heap.free(pid) {
                    Ok(()) => out.push_str(&render::deallocated(pid)),
                    Err(e) => {
                        failure = Some(e.to_string());
                        out.push_str(&format!("PID {pid} not found\n"));
                    }
                }
                out.push_str(&render::memory_table(&self.heap.snapshot()));
            }
            Command::Compact => {
                let report = self.heap.compact();
                out.push_str(&format!(
                    "Memory compacted successfully ({} blocks moved, {} free at tail).\n",
                    report.relocated, report.free_tail
                ));
                out.push_str(&render::memory_table(&self.heap.snapshot()));
            }
            Command::Display => out.push_str(&render::memory_table(&self.heap.snapshot())),
            Command::AddRelation { from, to } => match self.graph.add_edge(from, to) {
                Ok(()) => out.push_str(&format!("Added relation {from} -> {to}\n")),
                Err(e) => {
                    failure = Some(e.to_string());
                    out.push_str(&format!("Relation rejected: {e}\n"));
                }
            },
            Command::ShowGraph => out.push_str(&render::graph(&self.graph)),
            Command::Logout => {
                self.heap.reset();
                self.graph.clear();
                out.push_str("Session cleared.\n");
            }
            Command::Stats => out.push_str(&render::stats(&self.heap.stats())),
            Command::ShowFreeIndex => out.push_str(&render::free_index(
                &self.heap.free_index_entries(),
                self.heap.free_index_depth(),
            )),
            Command::ShowPidTable => {
                out.push_str(&render::pid_table(&self.heap.pid_table_entries()))
            }
            Command::SnapshotJson => {
                let json = serde_json::json!({
                    "total_memory": self.heap.total_memory(),
                    "next_pid": self.heap.next_pid(),
                    "blocks": self.heap.snapshot(),
                });
                let text = serde_json::to_string_pretty(&json)
                    .map_err(|e| PersistenceError::Encode(e.to_string()))?;
                out.push_str(&text);
                out.push('\n');
            }
        }

        Ok(Outcome {
            output: out,
            failure,
        })
    }

    fn persist(&self, command: &Command) -> SimResult<()> {
        if matches!(command, Command::Logout) {
            self.store.truncate()?;
            return Ok(());
        }
        self.store.save_heap(&self.heap.snapshot())?;
        self.store.save_graph(self.graph.edges())?;
        Ok(())
    }
}
