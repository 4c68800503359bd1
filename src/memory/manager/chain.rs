/*!
 * Block Chain
 * Address-ordered, singly-linked blocks stored in an arena of stable handles
 */

use super::super::types::{Block, BlockHandle, CompactionReport};
use crate::core::types::{Address, Size};
use std::ops::{Index, IndexMut};

#[derive(Debug, Clone)]
enum Slot {
    Occupied(Block),
    Vacant,
}

/// Ordered chain of blocks partitioning the address space
///
/// Blocks live in `slots`; links and external indices refer to them through
/// `BlockHandle`s. Released slots are recycled by later splits.
#[derive(Debug, Clone, Default)]
pub struct BlockChain {
    slots: Vec<Slot>,
    vacant: Vec<usize>,
    head: Option<BlockHandle>,
    len: usize,
}

impl BlockChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a chain from blocks already in address order
    pub fn from_blocks<I>(blocks: I) -> Self
    where
        I: IntoIterator<Item = Block>,
    {
        let mut chain = Self::new();
        let mut last: Option<BlockHandle> = None;
        for mut block in blocks {
            block.next = None;
            let handle = chain.store(block);
            match last {
                Some(prev) => chain[prev].next = Some(handle),
                None => chain.head = Some(handle),
            }
            last = Some(handle);
        }
        chain
    }

    /// Reset to a single free block spanning `[0, total)`
    pub fn init(&mut self, total: Size) -> BlockHandle {
        self.clear();
        let handle = self.store(Block::free(0, total));
        self.head = Some(handle);
        handle
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.vacant.clear();
        self.head = None;
        self.len = 0;
    }

    pub fn head(&self) -> Option<BlockHandle> {
        self.head
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, handle: BlockHandle) -> Option<&Block> {
        match self.slots.get(handle.0) {
            Some(Slot::Occupied(block)) => Some(block),
            _ => None,
        }
    }

    pub fn next_of(&self, handle: BlockHandle) -> Option<BlockHandle> {
        self.get(handle).and_then(|block| block.next)
    }

    /// Block immediately before `handle` in address order
    ///
    /// Linear walk from the head; the chain only links forward.
    pub fn predecessor(&self, handle: BlockHandle) -> Option<BlockHandle> {
        let mut prev = None;
        let mut current = self.head;
        while let Some(h) = current {
            if h == handle {
                return prev;
            }
            prev = Some(h);
            current = self[h].next;
        }
        None
    }

    /// First free block of at least `size`, in address order
    pub fn first_fit(&self, size: Size) -> Option<BlockHandle> {
        self.iter()
            .find(|(_, block)| block.is_free() && block.size >= size)
            .map(|(handle, _)| handle)
    }

    /// Shrink `handle` to `size` and link a free remainder right after it
    ///
    /// Requires `0 < size < block.size`. Returns the remainder's handle.
    pub fn split_after(&mut self, handle: BlockHandle, size: Size) -> BlockHandle {
        let (start, end, next) = {
            let block = &self[handle];
            debug_assert!(size > 0 && size < block.size);
            (block.start, block.end, block.next)
        };

        let split_at: Address = start + size;
        let mut remainder = Block::free(split_at, end - split_at);
        remainder.next = next;
        let remainder = self.store(remainder);

        let block = &mut self[handle];
        block.size = size;
        block.end = split_at;
        block.next = Some(remainder);
        remainder
    }

    /// Absorb the successor of `handle` into it, returning the discarded block
    pub fn remove_next(&mut self, handle: BlockHandle) -> Option<Block> {
        let next = self[handle].next?;
        let absorbed = self.release(next);

        let block = &mut self[handle];
        block.size += absorbed.size;
        block.end = absorbed.end;
        block.next = absorbed.next;
        Some(absorbed)
    }

    /// Slide allocated blocks to address 0 and replace all free blocks with
    /// one trailing free block. Allocated handles stay valid.
    pub fn compact(&mut self, total: Size) -> CompactionReport {
        let mut cursor: Address = 0;
        let mut relocated = 0;
        let mut new_head = None;
        let mut last: Option<BlockHandle> = None;
        let mut reclaimed = Vec::new();

        let mut current = self.head;
        while let Some(handle) = current {
            let block = &mut self[handle];
            current = block.next;

            if block.is_free() {
                reclaimed.push(handle);
                continue;
            }

            if block.start != cursor {
                relocated += 1;
            }
            block.start = cursor;
            block.end = cursor + block.size;
            block.next = None;
            cursor = block.end;

            match last {
                Some(prev) => self[prev].next = Some(handle),
                None => new_head = Some(handle),
            }
            last = Some(handle);
        }

        for handle in reclaimed {
            self.release(handle);
        }

        let free_tail = total.saturating_sub(cursor);
        if free_tail > 0 {
            let tail = self.store(Block::free(cursor, free_tail));
            match last {
                Some(prev) => self[prev].next = Some(tail),
                None => new_head = Some(tail),
            }
        }

        self.head = new_head;
        CompactionReport {
            relocated,
            free_tail,
        }
    }

    /// Iterate blocks in address order; each call starts again from the head
    pub fn iter(&self) -> ChainIter<'_> {
        ChainIter {
            chain: self,
            cursor: self.head,
        }
    }

    fn store(&mut self, block: Block) -> BlockHandle {
        self.len += 1;
        match self.vacant.pop() {
            Some(idx) => {
                self.slots[idx] = Slot::Occupied(block);
                BlockHandle(idx)
            }
            None => {
                self.slots.push(Slot::Occupied(block));
                BlockHandle(self.slots.len() - 1)
            }
        }
    }

    fn release(&mut self, handle: BlockHandle) -> Block {
        match std::mem::replace(&mut self.slots[handle.0], Slot::Vacant) {
            Slot::Occupied(block) => {
                self.vacant.push(handle.0);
                self.len -= 1;
                block
            }
            Slot::Vacant => panic!("released vacant block slot {:?}", handle),
        }
    }
}

impl Index<BlockHandle> for BlockChain {
    type Output = Block;

    fn index(&self, handle: BlockHandle) -> &Block {
        match &self.slots[handle.0] {
            Slot::Occupied(block) => block,
            Slot::Vacant => panic!("stale block handle {:?}", handle),
        }
    }
}

impl IndexMut<BlockHandle> for BlockChain {
    fn index_mut(&mut self, handle: BlockHandle) -> &mut Block {
        match &mut self.slots[handle.0] {
            Slot::Occupied(block) => block,
            Slot::Vacant => panic!("stale block handle {:?}", handle),
        }
    }
}

/// Address-order iterator over the chain
pub struct ChainIter<'a> {
    chain: &'a BlockChain,
    cursor: Option<BlockHandle>,
}

impl<'a> Iterator for ChainIter<'a> {
    type Item = (BlockHandle, &'a Block);

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.cursor?;
        let block = &self.chain[handle];
        self.cursor = block.next;
        Some((handle, block))
    }
}
