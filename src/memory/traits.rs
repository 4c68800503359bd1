/*!
 * Memory Traits
 * Heap management abstractions
 */

use super::types::*;
use crate::core::types::{Pid, Size};

/// Heap allocator interface
pub trait Allocator {
    /// Allocate a block and return the identifier of its new owner
    fn allocate(&mut self, size: Size) -> HeapResult<Pid>;

    /// Release the block owned by `pid`, coalescing with free neighbours
    fn free(&mut self, pid: Pid) -> HeapResult<()>;

    /// Slide allocated blocks to the front and merge all free space
    fn compact(&mut self) -> CompactionReport;
}

/// Heap statistics provider
pub trait MemoryInfo {
    /// Get overall heap statistics
    fn stats(&self) -> HeapStats;

    /// Get memory info as (total, used, available)
    fn info(&self) -> (Size, Size, Size);

    /// Get memory pressure level
    fn pressure(&self) -> MemoryPressure {
        self.stats().memory_pressure()
    }
}

/// Snapshot export and import
pub trait Snapshot {
    /// Ordered list of every block
    fn snapshot(&self) -> Vec<BlockRecord>;

    /// Replace the heap with the given ordered records
    fn restore(&mut self, records: &[BlockRecord]) -> HeapResult<()>;
}
