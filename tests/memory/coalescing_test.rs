/*!
 * Coalescing Tests
 * Freeing merges with free neighbours on either side
 */

use heapsim_kernel::memory::{BlockRecord, FreeKey, Heap, HeapError};
use pretty_assertions::assert_eq;

#[test]
fn test_free_without_free_neighbours() {
    let mut heap = Heap::with_capacity(1024);
    let a = heap.allocate(300).unwrap();
    heap.allocate(200).unwrap();
    heap.free(a).unwrap();

    assert_eq!(
        heap.snapshot(),
        vec![
            BlockRecord::free(0, 300),
            BlockRecord::allocated(2, 300, 200),
            BlockRecord::free(500, 524),
        ]
    );
    assert_eq!(
        heap.free_index_entries(),
        vec![
            FreeKey { size: 300, start: 0 },
            FreeKey { size: 524, start: 500 },
        ]
    );
}

#[test]
fn test_free_merges_both_sides() {
    let mut heap = Heap::with_capacity(1024);
    let a = heap.allocate(300).unwrap();
    let b = heap.allocate(200).unwrap();
    heap.free(a).unwrap();
    heap.free(b).unwrap();

    assert_eq!(heap.snapshot(), vec![BlockRecord::free(0, 1024)]);
    assert_eq!(
        heap.free_index_entries(),
        vec![FreeKey { size: 1024, start: 0 }]
    );
    assert!(heap.pid_table_entries().is_empty());
}

#[test]
fn test_free_merges_right_only() {
    let mut heap = Heap::with_capacity(300);
    heap.allocate(100).unwrap();
    let b = heap.allocate(100).unwrap();
    heap.free(b).unwrap();

    assert_eq!(
        heap.snapshot(),
        vec![BlockRecord::allocated(1, 0, 100), BlockRecord::free(100, 200)]
    );
    assert_eq!(heap.free_index_entries().len(), 1);
}

#[test]
fn test_free_merges_left_only() {
    let mut heap = Heap::with_capacity(300);
    let a = heap.allocate(100).unwrap();
    let b = heap.allocate(100).unwrap();
    heap.allocate(100).unwrap();
    heap.free(a).unwrap();
    heap.free(b).unwrap();

    assert_eq!(
        heap.snapshot(),
        vec![BlockRecord::free(0, 200), BlockRecord::allocated(3, 200, 100)]
    );
    assert_eq!(
        heap.free_index_entries(),
        vec![FreeKey { size: 200, start: 0 }]
    );
}

#[test]
fn test_middle_block_merges_into_union() {
    let mut heap = Heap::with_capacity(300);
    let a = heap.allocate(100).unwrap();
    let b = heap.allocate(100).unwrap();
    let c = heap.allocate(100).unwrap();
    heap.free(a).unwrap();
    heap.free(c).unwrap();
    heap.free(b).unwrap();

    assert_eq!(heap.snapshot(), vec![BlockRecord::free(0, 300)]);
    heap.validate().unwrap();
}

#[test]
fn test_double_free_is_rejected() {
    let mut heap = Heap::with_capacity(100);
    let a = heap.allocate(10).unwrap();
    heap.free(a).unwrap();
    let before = heap.snapshot();

    assert_eq!(heap.free(a), Err(HeapError::UnknownId(a)));
    assert_eq!(heap.free(99), Err(HeapError::UnknownId(99)));
    assert_eq!(heap.snapshot(), before);
}
