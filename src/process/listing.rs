/*!
 * Process Listing
 * Tree-ordered views of the process table for `ps`
 */

use super::core::types::ListEntry;
use super::entry::Process;
use super::table::ProcessTable;
use std::fmt::Write;

/// Walk the table depth-first: every top-level process followed by its children
///
/// A process whose parent has terminated is listed as top-level.
pub(crate) fn tree(table: &ProcessTable) -> Vec<ListEntry> {
    let mut entries = Vec::with_capacity(table.len());

    let roots = table
        .iter()
        .filter(|p| p.parent().map_or(true, |ppid| !table.contains(ppid)));

    for root in roots {
        push_subtree(table, root, 0, &mut entries);
    }
    entries
}

fn push_subtree(table: &ProcessTable, process: &Process, depth: usize, out: &mut Vec<ListEntry>) {
    out.push(ListEntry {
        depth,
        process: process.snapshot(),
    });
    for child in process.children().iter().filter_map(|&pid| table.get(pid)) {
        push_subtree(table, child, depth + 1, out);
    }
}

/// Render a listing as an aligned text table, children indented under parents
pub fn render(entries: &[ListEntry]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>6}  {:<24} {:<11} {:>8}", "PID", "NAME", "STATE", "PRIORITY");

    for entry in entries {
        let p = &entry.process;
        let name = if entry.depth == 0 {
            p.name.clone()
        } else {
            format!("{}└─ {}", "   ".repeat(entry.depth - 1), p.name)
        };
        let _ = writeln!(
            out,
            "{:>6}  {:<24} {:<11} {:>8}",
            p.pid, name, p.state, p.priority
        );
    }
    out
}
