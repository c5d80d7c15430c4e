/*!
 * Scheduler Core Operations
 * Admit, block, unblock, terminate, and schedule
 */

use super::{QueueLocation, Scheduler};
use crate::core::types::Pid;
use crate::process::core::types::{ProcessError, ProcessResult, ProcessState, ScheduleOutcome};
use crate::process::entry::Process;
use crate::process::table::ProcessTable;
use log::{debug, info, warn};
use std::time::Instant;

impl Scheduler {
    /// Admit a process at the tail of the ready queue
    ///
    /// Rejects a process the scheduler already tracks, since a second copy
    /// in the queue would corrupt round-robin order.
    pub fn admit(&mut self, process: &mut Process) -> ProcessResult<()> {
        let pid = process.pid();
        if self.locations.contains_key(&pid) {
            return Err(ProcessError::AlreadyScheduled {
                pid,
                state: process.state(),
            });
        }

        process.transition(ProcessState::Ready)?;
        self.ready_queue.push_back(pid);
        self.locations.insert(pid, QueueLocation::Ready);

        debug!("Process {} admitted (priority: {})", pid, process.priority());
        Ok(())
    }

    /// Move a ready or running process into the blocked set
    ///
    /// Blocking the running process clears the running slot. Blocking an
    /// already blocked process is rejected without touching any collection.
    pub fn block(&mut self, process: &mut Process) -> ProcessResult<()> {
        let pid = process.pid();
        let location = self.locations.get(&pid).copied();
        if location.is_none() || location == Some(QueueLocation::Blocked) {
            return Err(ProcessError::InvalidStateTransition {
                pid,
                from: process.state(),
                to: ProcessState::Blocked,
            });
        }

        process.transition(ProcessState::Blocked)?;
        self.detach(pid);
        self.blocked.insert(pid);
        self.locations.insert(pid, QueueLocation::Blocked);
        self.stats.inc_blocked();

        info!("Process {} blocked", pid);
        Ok(())
    }

    /// Move a blocked process back to the tail of the ready queue
    pub fn unblock(&mut self, process: &mut Process) -> ProcessResult<()> {
        let pid = process.pid();
        if !self.blocked.contains(&pid) {
            return Err(ProcessError::InvalidStateTransition {
                pid,
                from: process.state(),
                to: ProcessState::Ready,
            });
        }

        process.transition(ProcessState::Ready)?;
        self.blocked.remove(&pid);
        self.ready_queue.push_back(pid);
        self.locations.insert(pid, QueueLocation::Ready);
        self.stats.inc_unblocked();

        info!("Process {} unblocked", pid);
        Ok(())
    }

    /// Remove a process from whichever collection holds it and mark it terminated
    ///
    /// The caller evicts it from the process table.
    pub fn terminate(&mut self, process: &mut Process) -> ProcessResult<()> {
        let pid = process.pid();
        process.transition(ProcessState::Terminated)?;
        self.detach(pid);
        self.stats.inc_terminated();

        info!("Process {} terminated", pid);
        Ok(())
    }

    /// Run one scheduling step
    ///
    /// 1. A running process whose quantum expired is preempted to the tail.
    /// 2. A running process with quantum left yields to a non-empty ready
    ///    queue, or runs another burst when nothing else is ready.
    /// 3. With the slot free, the head of the ready queue is dispatched and
    ///    runs one burst.
    ///
    /// A failing burst terminates its process and evicts it from `table`.
    pub fn schedule(&mut self, table: &mut ProcessTable) -> ScheduleOutcome {
        let started = Instant::now();
        let outcome = self.step(table);
        self.stats.add_scheduling_time(started.elapsed());

        if let ScheduleOutcome::Failed { pid, .. } = outcome {
            table.evict(pid);
        }
        outcome
    }

    fn step(&mut self, table: &mut ProcessTable) -> ScheduleOutcome {
        if let Some(pid) = self.running {
            match table.get_mut(pid) {
                Some(process) if process.has_exceeded_quantum() => {
                    let held = process.context().time_quantum();
                    if self.requeue(process).is_ok() {
                        self.stats.inc_preemptions();
                        self.stats.inc_context_switches();
                        debug!("Process {} preempted after quantum {:?}", pid, held);
                    }
                }
                Some(process) if !self.ready_queue.is_empty() => {
                    if self.requeue(process).is_ok() {
                        self.stats.inc_yields();
                        debug!("Process {} yielded", pid);
                    }
                }
                Some(process) => return self.run_burst(process, false),
                None => {
                    warn!("Running process {} missing from table, clearing slot", pid);
                    self.detach(pid);
                }
            }
        }

        while let Some(pid) = self.ready_queue.pop_front() {
            let Some(process) = table.get_mut(pid) else {
                warn!("Ready process {} missing from table, dropping", pid);
                self.locations.remove(&pid);
                continue;
            };

            if let Err(e) = process.transition(ProcessState::Running) {
                warn!("Skipping dispatch of process {}: {}", pid, e);
                self.locations.remove(&pid);
                continue;
            }

            self.running = Some(pid);
            self.locations.insert(pid, QueueLocation::Running);
            self.stats.inc_scheduled();
            self.stats.inc_context_switches();

            debug!("Dispatched process {}", pid);
            return self.run_burst(process, true);
        }

        ScheduleOutcome::Idle
    }

    /// Return the running process to the tail of the ready queue
    fn requeue(&mut self, process: &mut Process) -> ProcessResult<()> {
        let pid = process.pid();
        process.transition(ProcessState::Ready)?;
        self.running = None;
        self.ready_queue.push_back(pid);
        self.locations.insert(pid, QueueLocation::Ready);
        Ok(())
    }

    fn run_burst(&mut self, process: &mut Process, dispatched: bool) -> ScheduleOutcome {
        let pid = process.pid();

        match process.execute() {
            Ok(elapsed) => {
                if elapsed > self.slow_burst_warning {
                    warn!(
                        "Process {} ({}) burst took {:?}, scheduler stalled",
                        pid,
                        process.name(),
                        elapsed
                    );
                }
                if dispatched {
                    ScheduleOutcome::Dispatched { pid }
                } else {
                    ScheduleOutcome::Continued { pid }
                }
            }
            Err(error) => {
                warn!(
                    "Process {} ({}) work failed, terminating: {}",
                    pid,
                    process.name(),
                    error
                );
                self.stats.inc_work_failures();
                if let Err(e) = self.terminate(process) {
                    warn!("Failed to terminate process {}: {}", pid, e);
                }
                ScheduleOutcome::Failed {
                    pid,
                    error: ProcessError::WorkFailed { pid, source: error },
                }
            }
        }
    }

    /// Drop `pid` from whichever collection currently holds it
    fn detach(&mut self, pid: Pid) {
        match self.locations.remove(&pid) {
            Some(QueueLocation::Running) => {
                if self.running == Some(pid) {
                    self.running = None;
                }
            }
            Some(QueueLocation::Ready) => {
                if let Some(pos) = self.ready_queue.iter().position(|&p| p == pid) {
                    self.ready_queue.remove(pos);
                }
            }
            Some(QueueLocation::Blocked) => {
                self.blocked.remove(&pid);
            }
            None => {}
        }
    }
}
