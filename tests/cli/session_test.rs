/*!
 * Session Tests
 * Multi-invocation behaviour through the snapshot files
 */

use heapsim_kernel::memory::BlockRecord;
use heapsim_kernel::{Command, HeapConfig, Session};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

fn run(config: &HeapConfig, args: &[&str]) -> String {
    let command = Command::parse(args).unwrap();
    Session::open(config).unwrap().execute(&command).unwrap()
}

#[test]
fn test_state_carries_across_invocations() {
    let dir = TempDir::new().unwrap();
    let config = HeapConfig::in_dir(dir.path());

    let out = run(&config, &["allocate", "300"]);
    assert!(out.starts_with("Allocated 300KB to PID 1"));
    let out = run(&config, &["allocate", "200"]);
    assert!(out.starts_with("Allocated 200KB to PID 2"));
    run(&config, &["deallocate", "1"]);

    let session = Session::open(&config).unwrap();
    assert_eq!(
        session.heap().snapshot(),
        vec![
            BlockRecord::free(0, 300),
            BlockRecord::allocated(2, 300, 200),
            BlockRecord::free(500, 524),
        ]
    );
    assert_eq!(session.heap().next_pid(), 3);
}

#[test]
fn test_display_does_not_write() {
    let dir = TempDir::new().unwrap();
    let config = HeapConfig::in_dir(dir.path());

    let out = run(&config, &["display"]);
    assert!(out.contains("-1      0         1024      1024        Free"));
    assert!(!config.heap_file.exists());
}

#[test]
fn test_relations_are_persisted() {
    let dir = TempDir::new().unwrap();
    let config = HeapConfig::in_dir(dir.path());

    assert_eq!(
        run(&config, &["add_relation", "3", "1"]),
        "Added relation 3 -> 1\n"
    );
    run(&config, &["add_relation", "3", "2"]);

    let out = run(&config, &["show_graph"]);
    assert_eq!(out, "\n--- Process Graph ---\nPID 3 -> 1 2 \n");
}

#[test]
fn test_out_of_range_relation_is_rejected() {
    let dir = TempDir::new().unwrap();
    let config = HeapConfig::in_dir(dir.path());

    let out = run(&config, &["add_relation", "150", "1"]);
    assert!(out.starts_with("Relation rejected"));
    assert!(Session::open(&config).unwrap().graph().is_empty());
}

#[test]
fn test_logout_clears_everything() {
    let dir = TempDir::new().unwrap();
    let config = HeapConfig::in_dir(dir.path());
    run(&config, &["allocate", "100"]);
    run(&config, &["add_relation", "1", "2"]);

    assert_eq!(run(&config, &["logout"]), "Session cleared.\n");
    assert_eq!(fs::metadata(&config.heap_file).unwrap().len(), 0);

    let out = run(&config, &["allocate", "50"]);
    assert!(out.starts_with("Allocated 50KB to PID 1"));
    assert!(Session::open(&config).unwrap().graph().is_empty());
}

#[test]
fn test_corrupt_heap_file_starts_fresh() {
    let dir = TempDir::new().unwrap();
    let config = HeapConfig::in_dir(dir.path());
    fs::write(&config.heap_file, [1u8, 2, 3]).unwrap();

    let session = Session::open(&config).unwrap();
    assert_eq!(session.heap().snapshot(), vec![BlockRecord::free(0, 1024)]);
}

#[test]
fn test_capacity_change_discards_snapshot() {
    let dir = TempDir::new().unwrap();
    let config = HeapConfig::in_dir(dir.path());
    run(&config, &["allocate", "100"]);

    let smaller = config.clone().with_total_memory(512);
    let session = Session::open(&smaller).unwrap();
    assert_eq!(session.heap().snapshot(), vec![BlockRecord::free(0, 512)]);
}

#[test]
fn test_compact_and_developer_views() {
    let dir = TempDir::new().unwrap();
    let config = HeapConfig::in_dir(dir.path());
    for size in ["300", "200", "200", "200"] {
        run(&config, &["allocate", size]);
    }
    run(&config, &["deallocate", "1"]);
    run(&config, &["deallocate", "3"]);

    let free_index = run(&config, &["show_free_index"]);
    assert!(free_index.contains("[size=124, start=900]"));
    assert!(free_index.contains("[size=300, start=0]"));

    let out = run(&config, &["compact"]);
    assert!(out.starts_with("Memory compacted successfully"));
    assert!(out.contains("-1      400       1024      624         Free"));

    let pid_table = run(&config, &["show_pid_table"]);
    assert!(pid_table.contains("PID 4 -> [200, 400) size 200"));

    let stats = run(&config, &["stats"]);
    assert!(stats.contains("Next PID:        5"));

    let json: serde_json::Value =
        serde_json::from_str(&run(&config, &["snapshot_json"])).unwrap();
    assert_eq!(json["total_memory"], 1024);
    assert_eq!(json["blocks"].as_array().map(Vec::len), Some(3));
}
