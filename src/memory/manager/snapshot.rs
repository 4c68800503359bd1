/*!
 * Heap Snapshots
 * Export, validated restore and invariant checking
 */

use super::super::types::{Block, BlockRecord, HeapError, HeapResult};
use super::chain::BlockChain;
use super::free_index::{FreeIndex, FreeKey};
use super::pid_index::PidIndex;
use super::Heap;
use crate::core::limits::FIRST_PID;
use crate::core::types::{Address, Pid, Size};
use ahash::AHashSet;
use tracing::{info, warn};

impl Heap {
    /// Ordered record of every block
    pub fn snapshot(&self) -> Vec<BlockRecord> {
        self.chain.iter().map(|(_, block)| block.record()).collect()
    }

    /// Replace the heap with `records`
    ///
    /// The records must partition `[0, total_memory)` in address order with
    /// unique positive PIDs. On error the current heap is left untouched.
    /// The identifier counter resumes after the highest restored PID.
    pub fn restore(&mut self, records: &[BlockRecord]) -> HeapResult<()> {
        let max_pid = check_records(records, self.total_memory).map_err(|reason| {
            warn!(reason = %reason, blocks = records.len(), "Rejected heap snapshot");
            HeapError::MalformedSnapshot(reason)
        })?;

        let chain = BlockChain::from_blocks(records.iter().map(|r| Block {
            pid: r.pid,
            size: r.size,
            start: r.start,
            end: r.end,
            next: None,
        }));

        let mut free_index = FreeIndex::new();
        free_index.rebuild_from(&chain)?;
        let mut pid_index = PidIndex::new();
        for (handle, block) in chain.iter() {
            if let Some(pid) = block.pid {
                pid_index.insert(pid, handle);
            }
        }

        self.chain = chain;
        self.free_index = free_index;
        self.pid_index = pid_index;
        self.next_pid = max_pid.map_or(FIRST_PID, |pid| pid + 1);

        info!(
            blocks = records.len(),
            allocated = self.pid_index.len(),
            next_pid = self.next_pid,
            "Restored heap snapshot"
        );
        Ok(())
    }

    /// Check every heap invariant
    ///
    /// Partition of `[0, total)`, conservation, free index and PID index
    /// agreement with the chain, and PIDs below the counter.
    pub fn validate(&self) -> HeapResult<()> {
        let records = self.snapshot();
        let max_pid = check_records(&records, self.total_memory).map_err(HeapError::Inconsistent)?;

        if let Some(max_pid) = max_pid {
            if max_pid >= self.next_pid {
                return Err(HeapError::Inconsistent(format!(
                    "PID {} is not below the counter {}",
                    max_pid, self.next_pid
                )));
            }
        }

        let mut chain_free: Vec<FreeKey> = self
            .chain
            .iter()
            .filter(|(_, b)| b.is_free())
            .map(|(_, b)| FreeKey::of(b))
            .collect();
        chain_free.sort_unstable();
        let indexed_free: Vec<FreeKey> = self
            .free_index
            .entries()
            .into_iter()
            .map(|(key, handle)| {
                if self.chain.get(handle).map(FreeKey::of) != Some(key) {
                    Err(HeapError::Inconsistent(format!(
                        "free index entry {:?} does not match its block",
                        key
                    )))
                } else {
                    Ok(key)
                }
            })
            .collect::<HeapResult<_>>()?;
        if chain_free != indexed_free {
            return Err(HeapError::Inconsistent(format!(
                "free index holds {} entries, chain has {} free blocks",
                indexed_free.len(),
                chain_free.len()
            )));
        }

        let allocated = records.iter().filter(|r| r.is_allocated()).count();
        if allocated != self.pid_index.len() {
            return Err(HeapError::Inconsistent(format!(
                "PID index holds {} entries, chain has {} allocated blocks",
                self.pid_index.len(),
                allocated
            )));
        }
        for (pid, handle) in self.pid_index.entries() {
            if self.chain.get(handle).and_then(|b| b.pid) != Some(pid) {
                return Err(HeapError::Inconsistent(format!(
                    "PID index entry {} points at a block it does not own",
                    pid
                )));
            }
        }

        Ok(())
    }
}

/// Validate record layout, returning the highest allocated PID
fn check_records(records: &[BlockRecord], total: Size) -> Result<Option<Pid>, String> {
    if records.is_empty() {
        return Err("snapshot contains no blocks".to_string());
    }

    let mut expected: Address = 0;
    let mut max_pid: Option<Pid> = None;
    let mut seen = AHashSet::new();

    for (i, record) in records.iter().enumerate() {
        if record.size == 0 {
            return Err(format!("block {} at {} has zero size", i, record.start));
        }
        if record.start != expected {
            return Err(format!(
                "block {} starts at {} but the previous block ends at {}",
                i, record.start, expected
            ));
        }
        if record.start.checked_add(record.size) != Some(record.end) {
            return Err(format!(
                "block {} spans [{}, {}) which does not match size {}",
                i, record.start, record.end, record.size
            ));
        }
        if let Some(pid) = record.pid {
            if pid < FIRST_PID {
                return Err(format!("block {} has invalid PID {}", i, pid));
            }
            if pid == Pid::MAX {
                return Err(format!(
                    "block {} has PID {} which leaves no identifier for the next allocation",
                    i, pid
                ));
            }
            if !seen.insert(pid) {
                return Err(format!("PID {} owns more than one block", pid));
            }
            max_pid = max_pid.max(Some(pid));
        }
        expected = record.end;
    }

    if expected != total {
        return Err(format!(
            "blocks cover [0, {}) but the heap capacity is {}",
            expected, total
        ));
    }
    Ok(max_pid)
}
