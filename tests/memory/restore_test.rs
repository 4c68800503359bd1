/*!
 * Snapshot Restore Tests
 */

use heapsim_kernel::memory::{BlockRecord, Heap, HeapError, Snapshot};
use pretty_assertions::assert_eq;

#[test]
fn test_restore_rebuilds_indices_and_counter() {
    let records = vec![
        BlockRecord::allocated(3, 0, 100),
        BlockRecord::free(100, 50),
        BlockRecord::allocated(7, 150, 50),
        BlockRecord::free(200, 824),
    ];
    let mut heap = Heap::uninitialized(1024);
    heap.restore(&records).unwrap();

    assert_eq!(heap.snapshot(), records);
    assert_eq!(heap.next_pid(), 8);
    assert_eq!(heap.pid_table_entries().len(), 2);
    assert_eq!(heap.free_index_entries().len(), 2);
    heap.validate().unwrap();

    heap.free(3).unwrap();
    assert_eq!(heap.snapshot()[0], BlockRecord::free(0, 150));
    assert_eq!(heap.allocate(10), Ok(8));
}

#[test]
fn test_restore_all_free_resets_counter() {
    let mut heap = Heap::with_capacity(100);
    heap.allocate(10).unwrap();
    heap.restore(&[BlockRecord::free(0, 100)]).unwrap();
    assert_eq!(heap.next_pid(), 1);
    assert!(heap.pid_table_entries().is_empty());
}

#[test]
fn test_snapshot_round_trip_between_heaps() {
    let mut source = Heap::with_capacity(512);
    let a = source.allocate(64).unwrap();
    source.allocate(128).unwrap();
    source.free(a).unwrap();

    let mut target = Heap::uninitialized(512);
    Snapshot::restore(&mut target, &source.snapshot()).unwrap();

    assert_eq!(target.snapshot(), source.snapshot());
    assert_eq!(target.next_pid(), 3);
}

#[test]
fn test_malformed_snapshots_leave_heap_untouched() {
    let mut heap = Heap::with_capacity(100);
    heap.allocate(40).unwrap();
    let before = heap.snapshot();

    let bad: [&[BlockRecord]; 6] = [
        &[],
        &[BlockRecord::free(0, 60)],
        &[BlockRecord::free(0, 50), BlockRecord::free(60, 40)],
        &[
            BlockRecord::allocated(2, 0, 50),
            BlockRecord::allocated(2, 50, 50),
        ],
        &[BlockRecord::allocated(0, 0, 100)],
        &[
            BlockRecord::allocated(i32::MAX, 0, 10),
            BlockRecord::free(10, 90),
        ],
    ];
    for records in bad {
        assert!(matches!(
            heap.restore(records),
            Err(HeapError::MalformedSnapshot(_))
        ));
        assert_eq!(heap.snapshot(), before);
        assert_eq!(heap.next_pid(), 2);
    }
}

#[test]
fn test_restore_near_identifier_limit_stays_consistent() {
    let mut heap = Heap::uninitialized(100);
    heap.restore(&[
        BlockRecord::allocated(i32::MAX - 1, 0, 10),
        BlockRecord::free(10, 90),
    ])
    .unwrap();

    assert_eq!(heap.next_pid(), i32::MAX);
    heap.validate().unwrap();
    assert_eq!(heap.allocate(5), Err(HeapError::PidSpaceExhausted));
}

#[test]
fn test_restore_rejects_mismatched_span() {
    let mut heap = Heap::uninitialized(100);
    let record = BlockRecord {
        pid: None,
        start: 0,
        end: 90,
        size: 100,
    };
    assert!(heap.restore(&[record]).is_err());
    assert!(heap.is_empty());
    assert!(heap.initialize_if_empty());
}

#[test]
fn test_reset_returns_to_initial_state() {
    let mut heap = Heap::with_capacity(256);
    heap.allocate(100).unwrap();
    heap.allocate(100).unwrap();
    heap.reset();

    assert_eq!(heap.snapshot(), vec![BlockRecord::free(0, 256)]);
    assert_eq!(heap.next_pid(), 1);
    assert!(!heap.initialize_if_empty());
}
