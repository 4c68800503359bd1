/*!
 * Heap Allocator Implementation
 * Allocation and deallocation logic
 */

use super::super::types::{HeapError, HeapResult};
use super::Heap;
use crate::core::types::{Pid, Size};
use tracing::{debug, info, warn};

impl Heap {
    /// Allocate `size` units to a fresh process identifier
    ///
    /// Best fit from the free index; a first-fit scan of the chain covers an
    /// index that unexpectedly comes back empty. Fails without touching state.
    pub fn allocate(&mut self, size: Size) -> HeapResult<Pid> {
        if size == 0 || size > self.total_memory {
            warn!(requested = size, total = self.total_memory, "Rejected allocation size");
            return Err(HeapError::InvalidSize {
                requested: size,
                total: self.total_memory,
            });
        }

        let chosen = match self.free_index.find_best_fit(size) {
            Some(handle) => handle,
            None => match self.chain.first_fit(size) {
                Some(handle) => {
                    warn!(
                        requested = size,
                        start = self.chain[handle].start,
                        "Free index had no fit, using first-fit chain scan"
                    );
                    handle
                }
                None => {
                    let stats = self.stats();
                    warn!(
                        requested = size,
                        largest_free = stats.largest_free_block,
                        available = stats.free_memory,
                        "OOM: no free block large enough"
                    );
                    return Err(HeapError::OutOfMemory {
                        requested: size,
                        largest_free: stats.largest_free_block,
                        available: stats.free_memory,
                    });
                }
            },
        };

        let pid = self.next_pid;
        let next_pid = pid.checked_add(1).ok_or(HeapError::PidSpaceExhausted)?;

        // The fallback path may pick a block the index never held.
        let original_size = self.chain[chosen].size;
        self.free_index.remove_block(&self.chain[chosen]);

        if original_size > size {
            let remainder = self.chain.split_after(chosen, size);
            self.free_index.insert(remainder, &self.chain[remainder])?;
            debug!(
                keep = size,
                remainder = original_size - size,
                remainder_start = self.chain[remainder].start,
                "Split free block"
            );
        }

        self.chain[chosen].pid = Some(pid);
        self.next_pid = next_pid;
        self.pid_index.insert(pid, chosen);

        let block = &self.chain[chosen];
        info!(
            pid,
            size,
            start = block.start,
            end = block.end,
            "Allocated block"
        );
        Ok(pid)
    }

    /// Release the block owned by `pid` and merge it with free neighbours
    pub fn free(&mut self, pid: Pid) -> HeapResult<()> {
        let handle = match self.pid_index.lookup(pid) {
            Some(handle) if self.chain.get(handle).is_some_and(|b| b.is_allocated()) => handle,
            _ => {
                warn!(pid, "Attempted to free unknown or already freed PID");
                return Err(HeapError::UnknownId(pid));
            }
        };

        self.chain[handle].pid = None;
        let mut survivor = handle;
        let mut merges = 0;

        // Right first: the current block survives this merge.
        if let Some(next) = self.chain.next_of(handle) {
            if self.chain[next].is_free() {
                self.free_index.remove_block(&self.chain[next]);
                self.chain.remove_next(handle);
                merges += 1;
            }
        }

        // Then left: the predecessor absorbs the current block.
        if let Some(prev) = self.chain.predecessor(handle) {
            if self.chain[prev].is_free() {
                self.free_index.remove_block(&self.chain[prev]);
                self.chain.remove_next(prev);
                survivor = prev;
                merges += 1;
            }
        }

        self.free_index.insert(survivor, &self.chain[survivor])?;
        self.pid_index.delete(pid);

        let block = &self.chain[survivor];
        info!(
            pid,
            merges,
            start = block.start,
            end = block.end,
            "Freed block"
        );
        Ok(())
    }
}
