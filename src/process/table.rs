/*!
 * Process Table
 * Owns every live process, indexed by PID and by name
 */

use super::entry::Process;
use crate::core::types::Pid;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Live process table
///
/// PIDs are allocated monotonically, so iterating the table yields
/// processes in registration order. Names are not unique; a name lookup
/// returns the earliest registered live process with that name.
#[derive(Debug, Default)]
pub struct ProcessTable {
    processes: BTreeMap<Pid, Process>,
    names: HashMap<String, BTreeSet<Pid>>,
}

impl ProcessTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a process, replacing nothing: PIDs are unique by construction
    pub fn insert(&mut self, process: Process) {
        let pid = process.pid();
        self.names
            .entry(process.name().to_string())
            .or_default()
            .insert(pid);
        self.processes.insert(pid, process);
    }

    #[inline]
    pub fn get(&self, pid: Pid) -> Option<&Process> {
        self.processes.get(&pid)
    }

    #[inline]
    pub fn get_mut(&mut self, pid: Pid) -> Option<&mut Process> {
        self.processes.get_mut(&pid)
    }

    #[inline]
    pub fn contains(&self, pid: Pid) -> bool {
        self.processes.contains_key(&pid)
    }

    /// First registered live process with this name
    pub fn find_by_name(&self, name: &str) -> Option<&Process> {
        self.names
            .get(name)
            .and_then(|pids| pids.iter().next())
            .and_then(|pid| self.processes.get(pid))
    }

    /// Remove a process from every index and detach it from its parent
    ///
    /// Children are left in place; their parent link no longer resolves.
    pub fn evict(&mut self, pid: Pid) -> Option<Process> {
        let process = self.processes.remove(&pid)?;

        if let Some(pids) = self.names.get_mut(process.name()) {
            pids.remove(&pid);
            if pids.is_empty() {
                self.names.remove(process.name());
            }
        }

        if let Some(parent) = process.parent().and_then(|ppid| self.processes.get_mut(&ppid)) {
            parent.remove_child(pid);
        }

        Some(process)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Process> {
        self.processes.values()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.processes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }
}
