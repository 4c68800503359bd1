/*!
 * Heap Statistics
 * Usage, fragmentation and pressure reporting
 */

use super::super::types::HeapStats;
use super::Heap;
use crate::core::types::Size;

impl Heap {
    /// Get overall heap info: (total, used, available)
    pub fn info(&self) -> (Size, Size, Size) {
        let used = self.used_memory();
        (self.total_memory, used, self.total_memory - used)
    }

    /// Get detailed heap statistics
    pub fn stats(&self) -> HeapStats {
        let mut used = 0;
        let mut allocated_blocks = 0;
        let mut free_blocks = 0;
        let mut largest_free = 0;

        for (_, block) in self.chain.iter() {
            if block.is_allocated() {
                used += block.size;
                allocated_blocks += 1;
            } else {
                free_blocks += 1;
                largest_free = largest_free.max(block.size);
            }
        }

        let free = self.total_memory - used;
        let fragmentation = if free == 0 {
            0.0
        } else {
            1.0 - largest_free as f64 / free as f64
        };
        let usage_percentage = if self.total_memory == 0 {
            0.0
        } else {
            (used as f64 / self.total_memory as f64) * 100.0
        };

        HeapStats {
            total_memory: self.total_memory,
            used_memory: used,
            free_memory: free,
            usage_percentage,
            allocated_blocks,
            free_blocks,
            largest_free_block: largest_free,
            fragmentation,
            next_pid: self.next_pid,
        }
    }

    fn used_memory(&self) -> Size {
        self.chain
            .iter()
            .filter(|(_, b)| b.is_allocated())
            .map(|(_, b)| b.size)
            .sum()
    }
}
