/*!
 * Process Management
 * Handles process creation, scheduling, and lifecycle
 */

use super::core::traits::Work;
use super::core::types::{
    ListEntry, ProcessError, ProcessResult, ProcessSnapshot, ProcessState, ProcessStatistics,
    ScheduleOutcome, SchedulerStats,
};
use super::entry::Process;
use super::listing;
use super::manager_builder::ProcessManagerBuilder;
use super::scheduler::{AtomicSchedulerStats, Scheduler};
use super::table::ProcessTable;
use crate::core::config::SchedulerConfig;
use crate::core::id::PidGenerator;
use crate::core::types::{Pid, Priority, SlotName, SlotValue};
use log::{error, info};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// Tables and scheduler, always mutated together under one lock
#[derive(Debug)]
struct ManagerState {
    table: ProcessTable,
    scheduler: Scheduler,
}

/// Public façade over process creation, scheduling, and inspection
///
/// Cloning yields another handle to the same manager. All mutation is
/// serialized by a single lock, and bursts run while that lock is held:
/// work must never call back into the manager that runs it.
#[derive(Clone)]
pub struct ProcessManager {
    state: Arc<Mutex<ManagerState>>,
    next_pid: Arc<PidGenerator>,
    stats: Arc<AtomicSchedulerStats>,
    config: SchedulerConfig,
}

impl ProcessManager {
    /// Create a process manager with default configuration
    pub fn new() -> Self {
        Self::with_config(SchedulerConfig::default())
    }

    /// Create a builder for constructing a ProcessManager
    pub fn builder() -> ProcessManagerBuilder {
        ProcessManagerBuilder::new()
    }

    pub fn with_config(config: SchedulerConfig) -> Self {
        Self::from_parts(config, PidGenerator::default())
    }

    pub(super) fn from_parts(config: SchedulerConfig, next_pid: PidGenerator) -> Self {
        let scheduler = Scheduler::new().with_slow_burst_warning(config.slow_burst_warning);
        let stats = scheduler.stats_handle();

        info!(
            "Process manager initialized (quantum: {:?}, default priority: {})",
            config.default_quantum, config.default_priority
        );

        Self {
            state: Arc::new(Mutex::new(ManagerState {
                table: ProcessTable::new(),
                scheduler,
            })),
            next_pid: Arc::new(next_pid),
            stats,
            config,
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Create a process and admit it to the ready queue
    pub fn create_process<W>(&self, name: impl Into<String>, work: W, priority: Priority) -> Pid
    where
        W: Work + 'static,
    {
        let mut state = self.state.lock();
        self.register(&mut state, name.into(), Box::new(work), priority, None)
    }

    /// Create a process with the configured default priority
    pub fn spawn<W>(&self, name: impl Into<String>, work: W) -> Pid
    where
        W: Work + 'static,
    {
        self.create_process(name, work, self.config.default_priority)
    }

    /// Create a child of `parent`
    ///
    /// The child's lifecycle is independent: terminating the parent does not
    /// terminate it. Returns `None` if `parent` is unknown.
    pub fn create_child_process<W>(
        &self,
        parent: Pid,
        name: impl Into<String>,
        work: W,
    ) -> Option<Pid>
    where
        W: Work + 'static,
    {
        let mut state = self.state.lock();
        if !state.table.contains(parent) {
            return None;
        }

        let priority = self.config.default_priority;
        let pid = self.register(&mut state, name.into(), Box::new(work), priority, Some(parent));
        if let Some(parent) = state.table.get_mut(parent) {
            parent.add_child(pid);
        }
        Some(pid)
    }

    fn register(
        &self,
        state: &mut ManagerState,
        name: String,
        work: Box<dyn Work>,
        priority: Priority,
        parent: Option<Pid>,
    ) -> Pid {
        let pid = self.next_pid.next();
        let mut process = Process::new(pid, name, priority, work, self.config.default_quantum);
        if let Some(ppid) = parent {
            process.set_parent(ppid);
        }

        // A fresh PID is never tracked yet, on failure it stays New and unscheduled
        if let Err(e) = state.scheduler.admit(&mut process) {
            error!("Failed to admit process {}: {}", pid, e);
        }

        info!(
            "Created process: {} (PID: {}, priority: {}, parent: {:?})",
            process.name(),
            pid,
            priority,
            parent
        );
        state.table.insert(process);
        pid
    }

    /// Run exactly one scheduling step
    ///
    /// The host loop must call this repeatedly; nothing advances otherwise.
    pub fn advance(&self) -> ScheduleOutcome {
        let mut state = self.state.lock();
        let ManagerState { table, scheduler } = &mut *state;
        scheduler.schedule(table)
    }

    /// Block a process, returns false if unknown or already blocked
    pub fn block(&self, pid: Pid) -> bool {
        self.try_block(pid).is_ok()
    }

    pub fn try_block(&self, pid: Pid) -> ProcessResult<()> {
        self.with_scheduled(pid, |scheduler, process| scheduler.block(process))
    }

    /// Unblock a process, returns false if unknown or not blocked
    pub fn unblock(&self, pid: Pid) -> bool {
        self.try_unblock(pid).is_ok()
    }

    pub fn try_unblock(&self, pid: Pid) -> ProcessResult<()> {
        self.with_scheduled(pid, |scheduler, process| scheduler.unblock(process))
    }

    /// Terminate a process and evict it from every table
    ///
    /// Children are not terminated; they become top-level processes.
    pub fn terminate(&self, pid: Pid) -> bool {
        self.try_terminate(pid).is_ok()
    }

    pub fn try_terminate(&self, pid: Pid) -> ProcessResult<()> {
        let mut state = self.state.lock();
        let ManagerState { table, scheduler } = &mut *state;
        let process = table.get_mut(pid).ok_or(ProcessError::NotFound(pid))?;
        scheduler.terminate(process)?;
        table.evict(pid);
        Ok(())
    }

    fn with_scheduled<F>(&self, pid: Pid, op: F) -> ProcessResult<()>
    where
        F: FnOnce(&mut Scheduler, &mut Process) -> ProcessResult<()>,
    {
        let mut state = self.state.lock();
        let ManagerState { table, scheduler } = &mut *state;
        let process = table.get_mut(pid).ok_or(ProcessError::NotFound(pid))?;
        op(scheduler, process)
    }

    /// Change a process's priority; the ready queue is not reordered
    pub fn set_priority(&self, pid: Pid, priority: Priority) -> bool {
        self.with_process_mut(pid, |process| {
            let old = process.priority();
            process.set_priority(priority);
            info!("Updated priority for PID {}: {} -> {}", pid, old, priority);
        })
    }

    /// Change a process's time quantum, effective from its next check
    pub fn set_quantum(&self, pid: Pid, quantum: Duration) -> bool {
        self.with_process_mut(pid, |process| {
            process.context_mut().set_time_quantum(quantum);
        })
    }

    /// Store a value in a process's execution context slots
    pub fn set_slot(&self, pid: Pid, name: impl Into<String>, value: SlotValue) -> bool {
        self.with_process_mut(pid, |process| {
            process.context_mut().set_slot(name, value);
        })
    }

    pub fn slot(&self, pid: Pid, name: &str) -> Option<SlotValue> {
        let state = self.state.lock();
        state
            .table
            .get(pid)
            .and_then(|process| process.context().slot(name).cloned())
    }

    /// Remove a slot, returning its last value
    pub fn remove_slot(&self, pid: Pid, name: &str) -> Option<SlotValue> {
        let mut state = self.state.lock();
        state
            .table
            .get_mut(pid)
            .and_then(|process| process.context_mut().remove_slot(name))
    }

    /// All slots of a process, sorted by name; `None` if the process is unknown
    pub fn slots(&self, pid: Pid) -> Option<BTreeMap<SlotName, SlotValue>> {
        let state = self.state.lock();
        state.table.get(pid).map(|process| {
            process
                .context()
                .slots()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect()
        })
    }

        fn with_process_mut<F>(&self, pid: Pid, op: F) -> bool
    where
        F: FnOnce(&mut Process),
    {
        let mut state = self.state.lock();
        match state.table.get_mut(pid) {
            Some(process) => {
                op(process);
                true
            }
            None => false,
        }
    }

    pub fn get_by_id(&self, pid: Pid) -> Option<ProcessSnapshot> {
        self.state.lock().table.get(pid).map(Process::snapshot)
    }

    /// First registered live process with this name
    pub fn get_by_name(&self, name: &str) -> Option<ProcessSnapshot> {
        self.state.lock().table.find_by_name(name).map(Process::snapshot)
    }

    /// Process tree: each top-level process followed by its children
    pub fn list_processes(&self) -> Vec<ListEntry> {
        listing::tree(&self.state.lock().table)
    }

    /// Text rendering of [`list_processes`](Self::list_processes) for `ps`
    pub fn render_process_list(&self) -> String {
        listing::render(&self.list_processes())
    }

    /// Count live processes by state
    pub fn get_statistics(&self) -> ProcessStatistics {
        let state = self.state.lock();
        let mut stats = ProcessStatistics::default();
        for process in state.table.iter() {
            stats.total += 1;
            match process.state() {
                ProcessState::Ready => stats.ready += 1,
                ProcessState::Running => stats.running += 1,
                ProcessState::Blocked => stats.blocked += 1,
                ProcessState::New | ProcessState::Terminated => {}
            }
        }
        stats
    }

    /// Scheduler counters, read without taking the table lock
    pub fn scheduler_statistics(&self) -> SchedulerStats {
        self.stats.snapshot()
    }

    /// Process holding the running slot
    pub fn running(&self) -> Option<Pid> {
        self.state.lock().scheduler.current()
    }

    /// Ready queue from head to tail
    pub fn ready_queue(&self) -> Vec<Pid> {
        self.state.lock().scheduler.ready_queue()
    }

    /// Blocked PIDs in ascending order
    pub fn blocked(&self) -> Vec<Pid> {
        self.state.lock().scheduler.blocked()
    }

    pub fn process_count(&self) -> usize {
        self.state.lock().table.len()
    }

    /// True once every process has terminated
    pub fn is_empty(&self) -> bool {
        self.state.lock().table.is_empty()
    }
}

impl Default for ProcessManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ProcessManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessManager")
            .field("config", &self.config)
            .field("next_pid", &self.next_pid.peek())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::core::traits::NoopWork;

    #[test]
    fn test_pids_are_monotonic_and_never_reused() {
        let pm = ProcessManager::new();
        let a = pm.spawn("a", NoopWork);
        let b = pm.spawn("b", NoopWork);
        assert_eq!((a, b), (1, 2));

        assert!(pm.terminate(b));
        let c = pm.spawn("c", NoopWork);
        assert_eq!(c, 3);
    }

    #[test]
    fn test_child_of_unknown_parent() {
        let pm = ProcessManager::new();
        assert_eq!(pm.create_child_process(42, "orphan", NoopWork), None);
        assert_eq!(pm.process_count(), 0);
        assert!(pm.is_empty());
    }

    #[test]
    fn test_admission_sets_ready() {
        let pm = ProcessManager::new();
        let pid = pm.create_process("a", NoopWork, 3);
        let snap = pm.get_by_id(pid).unwrap();
        assert_eq!(snap.state, ProcessState::Ready);
        assert_eq!(snap.priority, 3);
        assert_eq!(pm.ready_queue(), vec![pid]);
    }

    #[test]
    fn test_clone_shares_state() {
        let pm = ProcessManager::new();
        let other = pm.clone();
        let pid = pm.spawn("shared", NoopWork);
        assert!(other.get_by_id(pid).is_some());
        other.advance();
        assert_eq!(pm.running(), Some(pid));
    }
}
