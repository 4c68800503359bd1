/*!
 * PID Index
 * Process identifier to block handle lookup for O(1) deallocation
 */

use super::super::types::BlockHandle;
use crate::core::types::Pid;
use ahash::RandomState;
use std::collections::HashMap;

/// Hash map from owning PID to the handle of its allocated block
#[derive(Debug, Clone, Default)]
pub struct PidIndex {
    table: HashMap<Pid, BlockHandle, RandomState>,
}

impl PidIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `pid` to `handle`, returning any previous mapping
    pub fn insert(&mut self, pid: Pid, handle: BlockHandle) -> Option<BlockHandle> {
        self.table.insert(pid, handle)
    }

    pub fn lookup(&self, pid: Pid) -> Option<BlockHandle> {
        self.table.get(&pid).copied()
    }

    pub fn delete(&mut self, pid: Pid) -> Option<BlockHandle> {
        self.table.remove(&pid)
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Entries sorted by PID
    pub fn entries(&self) -> Vec<(Pid, BlockHandle)> {
        let mut entries: Vec<_> = self.table.iter().map(|(p, h)| (*p, *h)).collect();
        entries.sort_unstable_by_key(|(pid, _)| *pid);
        entries
    }
}
