/*!
 * Snapshot Codec
 * Fixed-width binary records for heap blocks and graph edges
 *
 * Heap file: one 32-byte record per block in chain order
 *   [id: i32][size: u64][start: u64][end: u64][allocated: i32]
 * Graph file: one 8-byte record per edge
 *   [from: i32][to: i32]
 *
 * Little-endian, no header, length prefix or checksum.
 */

use super::{PersistenceError, PersistenceResult};
use crate::core::limits::{BLOCK_RECORD_SIZE, EDGE_RECORD_SIZE, FREE_BLOCK_PID};
use crate::core::types::Pid;
use crate::memory::BlockRecord;
use serde::{Deserialize, Serialize};

/// On-disk block layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct RawBlock {
    id: Pid,
    size: u64,
    start: u64,
    end: u64,
    allocated: i32,
}

impl From<&BlockRecord> for RawBlock {
    fn from(record: &BlockRecord) -> Self {
        Self {
            id: record.pid.unwrap_or(FREE_BLOCK_PID),
            size: record.size,
            start: record.start,
            end: record.end,
            allocated: i32::from(record.is_allocated()),
        }
    }
}

impl From<RawBlock> for BlockRecord {
    fn from(raw: RawBlock) -> Self {
        BlockRecord {
            pid: (raw.allocated != 0).then_some(raw.id),
            start: raw.start,
            end: raw.end,
            size: raw.size,
        }
    }
}

/// On-disk edge layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct RawEdge {
    from: Pid,
    to: Pid,
}

pub fn encode_blocks(records: &[BlockRecord]) -> PersistenceResult<Vec<u8>> {
    let mut buf = Vec::with_capacity(records.len() * BLOCK_RECORD_SIZE);
    for record in records {
        bincode::serialize_into(&mut buf, &RawBlock::from(record))
            .map_err(|e| PersistenceError::Encode(e.to_string()))?;
    }
    Ok(buf)
}

pub fn decode_blocks(bytes: &[u8]) -> PersistenceResult<Vec<BlockRecord>> {
    decode_fixed::<RawBlock>(bytes, BLOCK_RECORD_SIZE)
        .map(|raws| raws.into_iter().map(BlockRecord::from).collect())
}

pub fn encode_edges<I>(edges: I) -> PersistenceResult<Vec<u8>>
where
    I: IntoIterator<Item = (Pid, Pid)>,
{
    let mut buf = Vec::new();
    for (from, to) in edges {
        bincode::serialize_into(&mut buf, &RawEdge { from, to })
            .map_err(|e| PersistenceError::Encode(e.to_string()))?;
    }
    Ok(buf)
}

pub fn decode_edges(bytes: &[u8]) -> PersistenceResult<Vec<(Pid, Pid)>> {
    decode_fixed::<RawEdge>(bytes, EDGE_RECORD_SIZE)
        .map(|raws| raws.into_iter().map(|e| (e.from, e.to)).collect())
}

fn decode_fixed<T>(bytes: &[u8], width: usize) -> PersistenceResult<Vec<T>>
where
    T: for<'de> Deserialize<'de>,
{
    if bytes.len() % width != 0 {
        return Err(PersistenceError::Truncated {
            len: bytes.len(),
            record_size: width,
        });
    }
    bytes
        .chunks_exact(width)
        .map(|chunk| {
            bincode::deserialize(chunk).map_err(|e| PersistenceError::Decode(e.to_string()))
        })
        .collect()
}
