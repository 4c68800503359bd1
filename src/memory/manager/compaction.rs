/*!
 * Heap Compaction
 * Relocates allocated blocks to the front of the address space
 */

use super::super::types::CompactionReport;
use super::Heap;
use tracing::{error, info};

impl Heap {
    /// Slide allocated blocks to address 0 in their current order and merge
    /// every free unit into one trailing block
    ///
    /// PID index entries stay valid because allocated handles are preserved;
    /// the free index is rebuilt since every free key changes.
    pub fn compact(&mut self) -> CompactionReport {
        let before = self.free_index.len();
        let report = self.chain.compact(self.total_memory);

        if let Err(e) = self.free_index.rebuild_from(&self.chain) {
            // Unreachable: the rebuild only visits free blocks.
            error!(error = %e, "Free index rebuild rejected a block after compaction");
        }

        info!(
            relocated = report.relocated,
            free_tail = report.free_tail,
            free_blocks_before = before,
            free_blocks_after = self.free_index.len(),
            "Compacted heap"
        );
        report
    }
}
