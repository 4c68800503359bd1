/*!
 * Memory Types
 * Common types for heap management
 */

use crate::core::limits::FREE_BLOCK_PID;
use crate::core::types::{Address, Pid, Size};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Heap operation result
pub type HeapResult<T> = Result<T, HeapError>;

/// Heap errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum HeapError {
    #[error("Invalid allocation size {requested} (must be between 1 and {total})")]
    #[diagnostic(
        code(heap::invalid_size),
        help("Request a positive size no larger than the heap capacity.")
    )]
    InvalidSize { requested: Size, total: Size },

    #[error("Out of memory: requested {requested}, largest free block {largest_free}, {available} free in total")]
    #[diagnostic(
        code(heap::out_of_memory),
        help("Free some processes or run `compact` to merge fragmented free space.")
    )]
    OutOfMemory {
        requested: Size,
        largest_free: Size,
        available: Size,
    },

    #[error("PID {0} not found or already free")]
    #[diagnostic(
        code(heap::unknown_id),
        help("Use `display` to list the PIDs that currently own memory.")
    )]
    UnknownId(Pid),

    #[error("Process identifier space exhausted")]
    #[diagnostic(code(heap::pid_exhausted), help("Run `logout` to reset the heap."))]
    PidSpaceExhausted,

    #[error("Block at {start} is allocated and cannot enter the free index")]
    #[diagnostic(code(heap::block_not_free))]
    BlockNotFree { start: Address },

    #[error("Malformed heap snapshot: {0}")]
    #[diagnostic(
        code(heap::malformed_snapshot),
        help("The snapshot file does not describe a contiguous heap; it will be reinitialized.")
    )]
    MalformedSnapshot(String),

    #[error("Heap invariant violated: {0}")]
    #[diagnostic(code(heap::inconsistent))]
    Inconsistent(String),
}

/// Stable arena handle of a block in the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockHandle(pub(crate) usize);

/// One contiguous address range of the heap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Owning process, `None` while free
    pub pid: Option<Pid>,
    pub size: Size,
    pub start: Address,
    pub end: Address,
    /// Address-order successor
    pub(crate) next: Option<BlockHandle>,
}

impl Block {
    pub fn free(start: Address, size: Size) -> Self {
        Self {
            pid: None,
            size,
            start,
            end: start + size,
            next: None,
        }
    }

    pub fn is_allocated(&self) -> bool {
        self.pid.is_some()
    }

    pub fn is_free(&self) -> bool {
        self.pid.is_none()
    }

    pub fn status(&self) -> BlockStatus {
        if self.is_allocated() {
            BlockStatus::Used
        } else {
            BlockStatus::Free
        }
    }

    pub fn record(&self) -> BlockRecord {
        BlockRecord {
            pid: self.pid,
            start: self.start,
            end: self.end,
            size: self.size,
        }
    }
}

/// Block state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockStatus {
    Free,
    Used,
}

impl std::fmt::Display for BlockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            BlockStatus::Free => write!(f, "Free"),
            BlockStatus::Used => write!(f, "Used"),
        }
    }
}

/// Read-only view of a block, used for display and snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRecord {
    pub pid: Option<Pid>,
    pub start: Address,
    pub end: Address,
    pub size: Size,
}

impl BlockRecord {
    pub fn allocated(pid: Pid, start: Address, size: Size) -> Self {
        Self {
            pid: Some(pid),
            start,
            end: start + size,
            size,
        }
    }

    pub fn free(start: Address, size: Size) -> Self {
        Self {
            pid: None,
            start,
            end: start + size,
            size,
        }
    }

    pub fn is_allocated(&self) -> bool {
        self.pid.is_some()
    }

    pub fn status(&self) -> BlockStatus {
        if self.is_allocated() {
            BlockStatus::Used
        } else {
            BlockStatus::Free
        }
    }

    /// PID column value, with free blocks shown as the sentinel
    pub fn display_pid(&self) -> Pid {
        self.pid.unwrap_or(FREE_BLOCK_PID)
    }
}

/// Outcome of a compaction pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactionReport {
    /// Allocated blocks whose start address changed
    pub relocated: usize,
    /// Size of the single trailing free block (0 when the heap is full)
    pub free_tail: Size,
}

/// Heap statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeapStats {
    pub total_memory: Size,
    pub used_memory: Size,
    pub free_memory: Size,
    pub usage_percentage: f64,
    pub allocated_blocks: usize,
    pub free_blocks: usize,
    pub largest_free_block: Size,
    /// 1 - largest_free / free_memory; 0 when free space is a single block
    pub fragmentation: f64,
    pub next_pid: Pid,
}

impl HeapStats {
    pub fn memory_pressure(&self) -> MemoryPressure {
        if self.usage_percentage >= 95.0 {
            MemoryPressure::Critical
        } else if self.usage_percentage >= 80.0 {
            MemoryPressure::High
        } else if self.usage_percentage >= 60.0 {
            MemoryPressure::Medium
        } else {
            MemoryPressure::Low
        }
    }
}

/// Memory pressure levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemoryPressure {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for MemoryPressure {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            MemoryPressure::Low => write!(f, "LOW"),
            MemoryPressure::Medium => write!(f, "MEDIUM"),
            MemoryPressure::High => write!(f, "HIGH"),
            MemoryPressure::Critical => write!(f, "CRITICAL"),
        }
    }
}
