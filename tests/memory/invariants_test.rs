/*!
 * Heap Invariant Properties
 * Random operation sequences checked against the structural invariants
 */

use heapsim_kernel::memory::{BlockRecord, Heap};
use proptest::prelude::*;

const TOTAL: u64 = 1024;

#[derive(Debug, Clone)]
enum Op {
    Allocate(u64),
    /// Index into the currently live PIDs
    Free(usize),
    Compact,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        5 => (1u64..300).prop_map(Op::Allocate),
        4 => any::<usize>().prop_map(Op::Free),
        1 => Just(Op::Compact),
    ]
}

fn assert_partition(records: &[BlockRecord]) -> Result<(), TestCaseError> {
    let mut expected = 0;
    for record in records {
        prop_assert_eq!(record.start, expected);
        prop_assert_eq!(record.end, record.start + record.size);
        prop_assert!(record.size > 0);
        expected = record.end;
    }
    prop_assert_eq!(expected, TOTAL);
    prop_assert_eq!(records.iter().map(|r| r.size).sum::<u64>(), TOTAL);
    Ok(())
}

proptest! {
    #[test]
    fn prop_invariants_hold_after_every_operation(ops in prop::collection::vec(op(), 1..80)) {
        let mut heap = Heap::with_capacity(TOTAL);
        let mut live: Vec<i32> = Vec::new();
        let mut last_pid = 0;

        for op in ops {
            match op {
                Op::Allocate(size) => {
                    if let Ok(pid) = heap.allocate(size) {
                        prop_assert!(pid > last_pid);
                        last_pid = pid;
                        live.push(pid);
                    }
                }
                Op::Free(i) if !live.is_empty() => {
                    let pid = live.swap_remove(i % live.len());
                    prop_assert!(heap.free(pid).is_ok());
                }
                Op::Free(_) => {}
                Op::Compact => {
                    heap.compact();
                }
            }

            assert_partition(&heap.snapshot())?;
            prop_assert!(heap.validate().is_ok());

            let mut owned: Vec<i32> = heap
                .pid_table_entries()
                .iter()
                .filter_map(|r| r.pid)
                .collect();
            owned.sort_unstable();
            let mut expected = live.clone();
            expected.sort_unstable();
            prop_assert_eq!(owned, expected);
        }
    }

    #[test]
    fn prop_no_adjacent_free_blocks_without_compaction(sizes in prop::collection::vec(1u64..120, 1..12), order in any::<u64>()) {
        let mut heap = Heap::with_capacity(TOTAL);
        let mut pids: Vec<i32> = sizes.iter().filter_map(|&s| heap.allocate(s).ok()).collect();

        let mut seed = order;
        while !pids.is_empty() {
            let pid = pids.swap_remove((seed % pids.len() as u64) as usize);
            seed = seed.rotate_left(7) ^ 0x9e37_79b9;
            heap.free(pid).unwrap();

            let records = heap.snapshot();
            for pair in records.windows(2) {
                prop_assert!(pair[0].is_allocated() || pair[1].is_allocated());
            }
        }
        prop_assert_eq!(heap.snapshot(), vec![BlockRecord::free(0, TOTAL)]);
    }

    #[test]
    fn prop_compaction_is_idempotent(sizes in prop::collection::vec(1u64..200, 1..10), frees in prop::collection::vec(any::<bool>(), 10)) {
        let mut heap = Heap::with_capacity(TOTAL);
        let pids: Vec<i32> = sizes.iter().filter_map(|&s| heap.allocate(s).ok()).collect();
        for (pid, free) in pids.iter().zip(frees) {
            if free {
                heap.free(*pid).unwrap();
            }
        }

        heap.compact();
        let once = heap.snapshot();
        heap.compact();
        prop_assert_eq!(heap.snapshot(), once.clone());

        let allocated = once.iter().filter(|r| r.is_allocated()).count();
        prop_assert!(once[..allocated].iter().all(BlockRecord::is_allocated));
        prop_assert!(once.len() <= allocated + 1);
    }
}
