/*!
 * System Limits and Constants
 *
 * Centralized location for simulator-wide limits and magic numbers.
 */

use super::types::{Pid, Size};

// =============================================================================
// MEMORY LIMITS
// =============================================================================

/// Total simulated memory (capacity units)
/// Used as default capacity for the heap
pub const DEFAULT_TOTAL_MEMORY: Size = 1024;

/// First identifier handed out by a fresh heap
pub const FIRST_PID: Pid = 1;

/// Identifier written for free blocks in persisted records and tables
pub const FREE_BLOCK_PID: Pid = -1;

/// Slow command threshold in milliseconds
pub const SLOW_COMMAND_MS: u128 = 10;

// =============================================================================
// PROCESS GRAPH LIMITS
// =============================================================================

/// Number of process slots in the dependency graph (PIDs 0..MAX_PROCESSES)
pub const MAX_PROCESSES: usize = 100;

// =============================================================================
// PERSISTENCE
// =============================================================================

/// Encoded size of one block record: i32 + 3 * u64 + i32
pub const BLOCK_RECORD_SIZE: usize = 4 + 8 + 8 + 8 + 4;

/// Encoded size of one graph edge: two i32 pids
pub const EDGE_RECORD_SIZE: usize = 4 + 4;

/// Default heap snapshot file name inside the state directory
pub const DEFAULT_HEAP_FILE: &str = "heap_state.dat";

/// Default graph snapshot file name inside the state directory
pub const DEFAULT_GRAPH_FILE: &str = "graph_state.dat";

/// Default state directory name under the system temp dir
pub const DEFAULT_STATE_DIR: &str = "heapsim-state";

/// Default log filter when RUST_LOG is unset
pub const DEFAULT_LOG_FILTER: &str = "warn";
