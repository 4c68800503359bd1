/*!
 * Output Rendering
 * Text views of the heap, its indices and the process graph
 */

use crate::core::types::Pid;
use crate::graph::ProcessGraph;
use crate::memory::{BlockRecord, FreeKey, HeapStats};
use std::fmt::Write;

const RULE: &str = "-------------------------------------------------------";

/// Block chain table, one row per block in address order
pub fn memory_table(records: &[BlockRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(
        out,
        "{:<8}{:<10}{:<10}{:<12}{:<10}",
        "PID", "START", "END", "SIZE(KB)", "STATUS"
    );
    let _ = writeln!(out, "{RULE}");
    for record in records {
        let _ = writeln!(
            out,
            "{:<8}{:<10}{:<10}{:<12}{:<10}",
            record.display_pid(),
            record.start,
            record.end,
            record.size,
            record.status().to_string()
        );
    }
    let _ = writeln!(out, "{RULE}");
    out
}

/// Dependency listing, one line per process with relations
pub fn graph(graph: &ProcessGraph) -> String {
    let mut out = String::from("\n--- Process Graph ---\n");
    for from in graph.sources() {
        let _ = write!(out, "PID {from} -> ");
        for to in graph.dependencies(from) {
            let _ = write!(out, "{to} ");
        }
        out.push('\n');
    }
    out
}

pub fn stats(stats: &HeapStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total memory:    {}", stats.total_memory);
    let _ = writeln!(
        out,
        "Used memory:     {} ({:.1}%)",
        stats.used_memory, stats.usage_percentage
    );
    let _ = writeln!(out, "Free memory:     {}", stats.free_memory);
    let _ = writeln!(out, "Allocated blocks: {}", stats.allocated_blocks);
    let _ = writeln!(out, "Free blocks:     {}", stats.free_blocks);
    let _ = writeln!(out, "Largest free:    {}", stats.largest_free_block);
    let _ = writeln!(out, "Fragmentation:   {:.2}", stats.fragmentation);
    let _ = writeln!(out, "Next PID:        {}", stats.next_pid);
    let _ = writeln!(out, "Pressure:        {}", stats.memory_pressure());
    out
}

/// Free index in key order
pub fn free_index(entries: &[FreeKey], depth: usize) -> String {
    let mut out = format!("--- Free Index ({} blocks, depth {}) ---\n", entries.len(), depth);
    for key in entries {
        let _ = writeln!(out, "[size={}, start={}]", key.size, key.start);
    }
    out
}

/// PID table in PID order
pub fn pid_table(records: &[BlockRecord]) -> String {
    let mut out = format!("--- PID Table ({} entries) ---\n", records.len());
    for record in records {
        let _ = writeln!(
            out,
            "PID {} -> [{}, {}) size {}",
            record.display_pid(),
            record.start,
            record.end,
            record.size
        );
    }
    out
}

pub fn allocated(size: u64, pid: Pid) -> String {
    format!("Allocated {size}KB to PID {pid}\n")
}

pub fn deallocated(pid: Pid) -> String {
    format!("Deallocated PID {pid}\n")
}
