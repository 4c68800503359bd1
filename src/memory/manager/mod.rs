/*!
 * Heap Management
 *
 * Simulated process heap with best-fit allocation, coalescing and compaction.
 *
 * ## Structures
 *
 * - **Block chain**: arena of blocks linked in address order, exactly
 *   partitioning `[0, total_memory)`
 * - **Free index**: unbalanced BST over free blocks keyed by `(size, start)`
 *   - Best-fit lookup in O(depth)
 * - **PID index**: hash map from owning PID to block handle
 *   - O(1) average lookup on free
 *
 * Both indices hold block handles, never references, so a block absorbed
 * during coalescing cannot leave a dangling entry behind.
 *
 * ## Operations
 *
 * - **Allocate**: best fit from the free index, first-fit chain scan as fallback,
 *   split off the unused tail
 * - **Free**: coalesce right, then left; exactly one free-index insertion
 * - **Compact**: slide allocated blocks to address 0, one trailing free block
 * - **Restore**: rebuild all three structures from validated records
 */

mod allocator;
mod chain;
mod compaction;
mod free_index;
mod pid_index;
mod snapshot;
mod stats;

pub use chain::{BlockChain, ChainIter};
pub use free_index::{FreeIndex, FreeKey};
pub use pid_index::PidIndex;

use super::traits::{Allocator, MemoryInfo, Snapshot};
use super::types::{BlockRecord, CompactionReport, HeapResult, HeapStats};
use crate::core::limits::{DEFAULT_TOTAL_MEMORY, FIRST_PID};
use crate::core::types::{Pid, Size};
use tracing::info;

/// Heap context: chain, both indices and the identifier counter
///
/// Every mutating operation takes `&mut self` and leaves all three
/// structures consistent before returning.
#[derive(Debug, Clone)]
pub struct Heap {
    pub(super) chain: BlockChain,
    pub(super) free_index: FreeIndex,
    pub(super) pid_index: PidIndex,
    pub(super) next_pid: Pid,
    pub(super) total_memory: Size,
}

impl Heap {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_TOTAL_MEMORY)
    }

    /// Create an initialized heap with custom capacity
    ///
    /// `total` must be positive; a zero capacity heap stays empty.
    pub fn with_capacity(total: Size) -> Self {
        let mut heap = Self::uninitialized(total);
        heap.initialize_if_empty();
        heap
    }

    /// Heap with no blocks yet; callers restore a snapshot or initialize it
    pub fn uninitialized(total: Size) -> Self {
        Self {
            chain: BlockChain::new(),
            free_index: FreeIndex::new(),
            pid_index: PidIndex::new(),
            next_pid: FIRST_PID,
            total_memory: total,
        }
    }

    /// Establish the single full-capacity free block when no state exists
    ///
    /// Returns true when initialization happened.
    pub fn initialize_if_empty(&mut self) -> bool {
        if !self.chain.is_empty() || self.total_memory == 0 {
            return false;
        }
        self.reset();
        true
    }

    /// Back to one free block, empty PID index, counter at 1
    pub fn reset(&mut self) {
        self.pid_index.clear();
        self.free_index.clear();
        self.next_pid = FIRST_PID;
        if self.total_memory == 0 {
            self.chain.clear();
            return;
        }

        let head = self.chain.init(self.total_memory);
        // A fresh free block is always accepted by the index.
        let _ = self.free_index.insert(head, &self.chain[head]);
        info!(total = self.total_memory, "Heap initialized with a single free block");
    }

    pub fn total_memory(&self) -> Size {
        self.total_memory
    }

    /// Identifier the next successful allocation will receive
    pub fn next_pid(&self) -> Pid {
        self.next_pid
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Number of blocks in the chain
    pub fn block_count(&self) -> usize {
        self.chain.len()
    }

    /// Record of the block owned by `pid`, if any
    pub fn lookup(&self, pid: Pid) -> Option<BlockRecord> {
        let handle = self.pid_index.lookup(pid)?;
        self.chain.get(handle).map(|block| block.record())
    }

    /// Free index listing as (size, start), key ascending
    pub fn free_index_entries(&self) -> Vec<FreeKey> {
        self.free_index.entries().into_iter().map(|(key, _)| key).collect()
    }

    /// PID index listing as records, PID ascending
    pub fn pid_table_entries(&self) -> Vec<BlockRecord> {
        self.pid_index
            .entries()
            .into_iter()
            .filter_map(|(_, handle)| self.chain.get(handle).map(|b| b.record()))
            .collect()
    }

    /// Height of the free index tree
    pub fn free_index_depth(&self) -> usize {
        self.free_index.depth()
    }
}

// Implement trait interfaces
impl Allocator for Heap {
    fn allocate(&mut self, size: Size) -> HeapResult<Pid> {
        Heap::allocate(self, size)
    }

    fn free(&mut self, pid: Pid) -> HeapResult<()> {
        Heap::free(self, pid)
    }

    fn compact(&mut self) -> CompactionReport {
        Heap::compact(self)
    }
}

impl MemoryInfo for Heap {
    fn stats(&self) -> HeapStats {
        Heap::stats(self)
    }

    fn info(&self) -> (Size, Size, Size) {
        Heap::info(self)
    }
}

impl Snapshot for Heap {
    fn snapshot(&self) -> Vec<BlockRecord> {
        Heap::snapshot(self)
    }

    fn restore(&mut self, records: &[BlockRecord]) -> HeapResult<()> {
        Heap::restore(self, records)
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}
