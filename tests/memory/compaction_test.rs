/*!
 * Compaction Tests
 */

use heapsim_kernel::memory::{BlockRecord, FreeKey, Heap};
use pretty_assertions::assert_eq;

/// Allocated blocks at [300,500) and [700,900), everything else free
fn scattered_heap() -> Heap {
    let mut heap = Heap::with_capacity(1024);
    let a = heap.allocate(300).unwrap();
    heap.allocate(200).unwrap();
    let c = heap.allocate(200).unwrap();
    heap.allocate(200).unwrap();
    heap.free(a).unwrap();
    heap.free(c).unwrap();
    heap
}

#[test]
fn test_compaction_slides_blocks_to_front() {
    let mut heap = scattered_heap();
    let report = heap.compact();

    assert_eq!(
        heap.snapshot(),
        vec![
            BlockRecord::allocated(2, 0, 200),
            BlockRecord::allocated(4, 200, 200),
            BlockRecord::free(400, 624),
        ]
    );
    assert_eq!(report.relocated, 2);
    assert_eq!(report.free_tail, 624);
    assert_eq!(
        heap.free_index_entries(),
        vec![FreeKey { size: 624, start: 400 }]
    );
    assert_eq!(heap.lookup(4).map(|r| r.start), Some(200));
}

#[test]
fn test_compaction_is_idempotent() {
    let mut heap = scattered_heap();
    heap.compact();
    let first = heap.snapshot();
    let report = heap.compact();
    assert_eq!(heap.snapshot(), first);
    assert_eq!(report.relocated, 0);
}

#[test]
fn test_compacting_full_heap_leaves_no_free_block() {
    let mut heap = Heap::with_capacity(100);
    heap.allocate(60).unwrap();
    heap.allocate(40).unwrap();
    let report = heap.compact();

    assert_eq!(report.free_tail, 0);
    assert_eq!(heap.block_count(), 2);
    assert!(heap.free_index_entries().is_empty());
    heap.validate().unwrap();
}

#[test]
fn test_compacting_empty_heap() {
    let mut heap = Heap::with_capacity(1024);
    heap.compact();
    assert_eq!(heap.snapshot(), vec![BlockRecord::free(0, 1024)]);
}

#[test]
fn test_compaction_enables_large_allocation() {
    let mut heap = scattered_heap();
    assert!(heap.allocate(600).is_err());
    heap.compact();
    assert_eq!(heap.allocate(600), Ok(5));
}
