/*!
 * Snapshot Store Tests
 * Heap and graph state surviving a trip through the filesystem
 */

use heapsim_kernel::core::limits::BLOCK_RECORD_SIZE;
use heapsim_kernel::memory::{BlockRecord, Heap};
use heapsim_kernel::persistence::{PersistenceError, SnapshotStore};
use heapsim_kernel::ProcessGraph;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

fn store(dir: &TempDir) -> SnapshotStore {
    SnapshotStore::new(dir.path().join("heap.dat"), dir.path().join("graph.dat"))
}

#[test]
fn test_heap_survives_save_and_load() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);

    let mut heap = Heap::with_capacity(1024);
    let a = heap.allocate(300).unwrap();
    heap.allocate(200).unwrap();
    heap.free(a).unwrap();
    store.save_heap(&heap.snapshot()).unwrap();

    assert_eq!(
        fs::metadata(store.heap_path()).unwrap().len() as usize,
        3 * BLOCK_RECORD_SIZE
    );

    let records = store.load_heap().unwrap().unwrap();
    let mut reloaded = Heap::uninitialized(1024);
    reloaded.restore(&records).unwrap();
    assert_eq!(reloaded.snapshot(), heap.snapshot());
    assert_eq!(reloaded.next_pid(), 3);
}

#[test]
fn test_graph_survives_save_and_load() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);

    let mut graph = ProcessGraph::new();
    graph.add_edge(3, 1).unwrap();
    graph.add_edge(1, 2).unwrap();
    store.save_graph(graph.edges()).unwrap();

    let edges = store.load_graph().unwrap().unwrap();
    assert_eq!(edges, vec![(1, 2), (3, 1)]);
    assert_eq!(ProcessGraph::from_edges(edges), graph);
}

#[test]
fn test_partial_record_is_reported() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    fs::write(store.heap_path(), vec![0u8; BLOCK_RECORD_SIZE + 5]).unwrap();

    assert!(matches!(
        store.load_heap(),
        Err(PersistenceError::Truncated { record_size, .. }) if record_size == BLOCK_RECORD_SIZE
    ));
}

#[test]
fn test_empty_file_means_no_state() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    fs::write(store.heap_path(), b"").unwrap();
    assert_eq!(store.load_heap().unwrap(), None::<Vec<BlockRecord>>);
}

#[test]
fn test_save_overwrites_previous_state() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    store
        .save_heap(&[BlockRecord::allocated(1, 0, 10), BlockRecord::free(10, 90)])
        .unwrap();
    store.save_heap(&[BlockRecord::free(0, 100)]).unwrap();

    assert_eq!(
        store.load_heap().unwrap(),
        Some(vec![BlockRecord::free(0, 100)])
    );
}
