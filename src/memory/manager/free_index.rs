/*!
 * Free Index
 * Best-fit search tree over free blocks, keyed by (size, start)
 */

use super::super::types::{Block, BlockHandle, HeapError, HeapResult};
use super::chain::BlockChain;
use crate::core::types::{Address, Size};
use std::cmp::Ordering;

/// Ordering key: size first, start address breaks ties
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FreeKey {
    pub size: Size,
    pub start: Address,
}

impl FreeKey {
    pub fn of(block: &Block) -> Self {
        Self {
            size: block.size,
            start: block.start,
        }
    }
}

#[derive(Debug, Clone)]
struct Node {
    key: FreeKey,
    block: BlockHandle,
    left: Option<usize>,
    right: Option<usize>,
}

/// Unbalanced binary search tree of free blocks
///
/// Nodes are stored in an arena and refer to blocks by handle. Depth is
/// O(log n) on average and O(n) for sorted insertion orders.
#[derive(Debug, Clone, Default)]
pub struct FreeIndex {
    nodes: Vec<Node>,
    vacant: Vec<usize>,
    root: Option<usize>,
    len: usize,
}

impl FreeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.vacant.clear();
        self.root = None;
        self.len = 0;
    }

    /// Insert a free block under its current key
    pub fn insert(&mut self, handle: BlockHandle, block: &Block) -> HeapResult<()> {
        if block.is_allocated() {
            return Err(HeapError::BlockNotFree { start: block.start });
        }

        let key = FreeKey::of(block);
        let idx = self.alloc_node(Node {
            key,
            block: handle,
            left: None,
            right: None,
        });

        let Some(mut current) = self.root else {
            self.root = Some(idx);
            return Ok(());
        };
        loop {
            let node = &mut self.nodes[current];
            let child = if key < node.key {
                &mut node.left
            } else {
                &mut node.right
            };
            match *child {
                Some(next) => current = next,
                None => {
                    *child = Some(idx);
                    return Ok(());
                }
            }
        }
    }

    /// Delete the entry with exactly this key
    ///
    /// A node with two children takes over its in-order successor's entry.
    pub fn delete(&mut self, size: Size, start: Address) -> Option<BlockHandle> {
        let key = FreeKey { size, start };

        let mut parent: Option<usize> = None;
        let mut current = self.root;
        while let Some(idx) = current {
            match key.cmp(&self.nodes[idx].key) {
                Ordering::Less => {
                    parent = Some(idx);
                    current = self.nodes[idx].left;
                }
                Ordering::Greater => {
                    parent = Some(idx);
                    current = self.nodes[idx].right;
                }
                Ordering::Equal => break,
            }
        }

        let idx = current?;
        let removed = self.nodes[idx].block;

        match (self.nodes[idx].left, self.nodes[idx].right) {
            (Some(_), Some(right)) => {
                let mut succ_parent = idx;
                let mut succ = right;
                while let Some(left) = self.nodes[succ].left {
                    succ_parent = succ;
                    succ = left;
                }

                let succ_right = self.nodes[succ].right;
                if succ_parent == idx {
                    self.nodes[idx].right = succ_right;
                } else {
                    self.nodes[succ_parent].left = succ_right;
                }

                self.nodes[idx].key = self.nodes[succ].key;
                self.nodes[idx].block = self.nodes[succ].block;
                self.vacant.push(succ);
            }
            (left, right) => {
                self.replace_child(parent, idx, left.or(right));
                self.vacant.push(idx);
            }
        }

        self.len -= 1;
        Some(removed)
    }

    /// Delete the entry for a block under its current key
    pub fn remove_block(&mut self, block: &Block) -> Option<BlockHandle> {
        self.delete(block.size, block.start)
    }

    /// Smallest free block with size >= `requested`
    ///
    /// Single top-down walk: an exact size match stops the search, a larger
    /// node becomes the candidate and the walk continues left, a smaller node
    /// sends it right.
    pub fn find_best_fit(&self, requested: Size) -> Option<BlockHandle> {
        let mut best = None;
        let mut current = self.root;
        while let Some(idx) = current {
            let node = &self.nodes[idx];
            match node.key.size.cmp(&requested) {
                Ordering::Equal => return Some(node.block),
                Ordering::Greater => {
                    best = Some(node.block);
                    current = node.left;
                }
                Ordering::Less => current = node.right,
            }
        }
        best
    }

    /// Clear and re-insert every free block of the chain
    pub fn rebuild_from(&mut self, chain: &BlockChain) -> HeapResult<()> {
        self.clear();
        for (handle, block) in chain.iter().filter(|(_, b)| b.is_free()) {
            self.insert(handle, block)?;
        }
        Ok(())
    }

    /// In-order (key ascending) listing of the tree
    pub fn entries(&self) -> Vec<(FreeKey, BlockHandle)> {
        let mut out = Vec::with_capacity(self.len);
        let mut stack = Vec::new();
        let mut current = self.root;
        while current.is_some() || !stack.is_empty() {
            while let Some(idx) = current {
                stack.push(idx);
                current = self.nodes[idx].left;
            }
            if let Some(idx) = stack.pop() {
                out.push((self.nodes[idx].key, self.nodes[idx].block));
                current = self.nodes[idx].right;
            }
        }
        out
    }

    /// Height of the tree (0 when empty)
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(usize, usize)> = self.root.map(|r| (r, 1)).into_iter().collect();
        while let Some((idx, level)) = stack.pop() {
            deepest = deepest.max(level);
            let node = &self.nodes[idx];
            stack.extend(node.left.map(|l| (l, level + 1)));
            stack.extend(node.right.map(|r| (r, level + 1)));
        }
        deepest
    }

    fn alloc_node(&mut self, node: Node) -> usize {
        self.len += 1;
        match self.vacant.pop() {
            Some(idx) => {
                self.nodes[idx] = node;
                idx
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    fn replace_child(&mut self, parent: Option<usize>, old: usize, new: Option<usize>) {
        match parent {
            None => self.root = new,
            Some(p) if self.nodes[p].left == Some(old) => self.nodes[p].left = new,
            Some(p) => self.nodes[p].right = new,
        }
    }
}
