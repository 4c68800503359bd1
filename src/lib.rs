/*!
 * Heap Simulator Library
 * Simulated process heap with persistent state, exposed as a library
 */

pub mod cli;
pub mod core;
pub mod graph;
pub mod memory;
pub mod monitoring;
pub mod persistence;

// Re-exports
pub use cli::{Command, Session};
pub use crate::core::{HeapConfig, SimError, SimResult};
pub use graph::ProcessGraph;
pub use memory::{Allocator, BlockRecord, Heap, HeapError, HeapStats, MemoryInfo, Snapshot};
pub use monitoring::init_tracing;
pub use persistence::SnapshotStore;
