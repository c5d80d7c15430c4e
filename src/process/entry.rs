/*!
 * Process Entity
 * A schedulable unit: identity, state, work, and execution context
 */

use super::context::ExecutionContext;
use super::core::traits::Work;
use super::core::types::{ProcessError, ProcessResult, ProcessSnapshot, ProcessState, WorkError};
use crate::core::types::{Pid, Priority};
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};
use time::OffsetDateTime;

/// A schedulable process
///
/// Processes are owned by the manager's table. Parent and child links are
/// PIDs, so a process never owns its relatives.
pub struct Process {
    pid: Pid,
    name: String,
    priority: Priority,
    state: ProcessState,
    parent: Option<Pid>,
    children: Vec<Pid>,
    work: Box<dyn Work>,
    context: ExecutionContext,
    created_at: OffsetDateTime,
    burst_started: Option<Instant>,
}

impl Process {
    pub fn new(
        pid: Pid,
        name: impl Into<String>,
        priority: Priority,
        work: Box<dyn Work>,
        time_quantum: Duration,
    ) -> Self {
        Self {
            pid,
            name: name.into(),
            priority,
            state: ProcessState::New,
            parent: None,
            children: Vec::new(),
            work,
            context: ExecutionContext::new(time_quantum),
            created_at: OffsetDateTime::now_utc(),
            burst_started: None,
        }
    }

    /// Run one burst of work
    ///
    /// Records the burst start, marks the process running, invokes the work
    /// and folds the elapsed time into the context. A panic inside the work
    /// is caught and reported as [`WorkError::Panicked`]. Whether the process
    /// keeps the running slot afterwards is the scheduler's decision.
    pub fn execute(&mut self) -> Result<Duration, WorkError> {
        let started = Instant::now();
        self.burst_started = Some(started);
        self.state = ProcessState::Running;

        let work = &mut self.work;
        let result = panic::catch_unwind(AssertUnwindSafe(|| work.invoke()))
            .unwrap_or_else(|payload| Err(WorkError::Panicked(panic_message(payload.as_ref()))));

        let elapsed = started.elapsed();
        self.context.record_burst(elapsed);
        result.map(|()| elapsed)
    }

    /// True once the current burst has held the slot for its whole quantum
    ///
    /// A process that has never run has not exceeded anything.
    #[inline]
    pub fn has_exceeded_quantum(&self) -> bool {
        self.burst_started
            .is_some_and(|started| started.elapsed() >= self.context.time_quantum())
    }

    /// Move to `to` if the state machine allows it
    pub(crate) fn transition(&mut self, to: ProcessState) -> ProcessResult<()> {
        if !self.state.can_transition_to(to) {
            return Err(ProcessError::InvalidStateTransition {
                pid: self.pid,
                from: self.state,
                to,
            });
        }
        if to != ProcessState::Running {
            self.burst_started = None;
        }
        self.state = to;
        Ok(())
    }

    #[inline]
    pub fn pid(&self) -> Pid {
        self.pid
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn priority(&self) -> Priority {
        self.priority
    }

    #[inline]
    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }

    #[inline]
    pub fn state(&self) -> ProcessState {
        self.state
    }

    #[inline]
    pub fn parent(&self) -> Option<Pid> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Pid) {
        self.parent = Some(parent);
    }

    #[inline]
    pub fn children(&self) -> &[Pid] {
        &self.children
    }

    pub(crate) fn add_child(&mut self, child: Pid) {
        self.children.push(child);
    }

    pub(crate) fn remove_child(&mut self, child: Pid) {
        self.children.retain(|&pid| pid != child);
    }

    #[inline]
    pub fn context(&self) -> &ExecutionContext {
        &self.context
    }

    #[inline]
    pub fn context_mut(&mut self) -> &mut ExecutionContext {
        &mut self.context
    }

    #[inline]
    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    pub fn snapshot(&self) -> ProcessSnapshot {
        ProcessSnapshot {
            pid: self.pid,
            name: self.name.clone(),
            state: self.state,
            priority: self.priority,
            parent: self.parent,
            children: self.children.clone(),
            cpu_time_micros: self.context.accumulated_run_time().as_micros() as u64,
            burst_count: self.context.burst_count(),
            quantum_micros: self.context.time_quantum().as_micros() as u64,
            created_at: self.created_at,
        }
    }
}

impl fmt::Debug for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Process")
            .field("pid", &self.pid)
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("state", &self.state)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::core::traits::{from_fn, NoopWork};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::thread;

    fn noop(pid: Pid, quantum: Duration) -> Process {
        Process::new(pid, "test", 1, Box::new(NoopWork), quantum)
    }

    #[test]
    fn test_new_process_state() {
        let process = noop(1, Duration::from_millis(100));
        assert_eq!(process.state(), ProcessState::New);
        assert_eq!(process.context().burst_count(), 0);
        assert!(!process.has_exceeded_quantum());
    }

    #[test]
    fn test_execute_runs_work_and_accounts() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let mut process = Process::new(
            7,
            "counter",
            1,
            Box::new(from_fn(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })),
            Duration::from_millis(100),
        );

        process.execute().unwrap();
        process.execute().unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(process.state(), ProcessState::Running);
        assert_eq!(process.context().burst_count(), 2);
    }

    #[test]
    fn test_execute_reports_failure() {
        let mut process = Process::new(
            1,
            "fails",
            1,
            Box::new(|| Err::<(), _>(WorkError::failed("boom"))),
            Duration::from_millis(100),
        );
        assert_eq!(process.execute(), Err(WorkError::Failed("boom".into())));
        // A failed burst still counts as a burst
        assert_eq!(process.context().burst_count(), 1);
    }

    #[test]
    fn test_execute_catches_panic() {
        let mut process = Process::new(
            1,
            "panics",
            1,
            Box::new(from_fn(|| panic!("bad work"))),
            Duration::from_millis(100),
        );
        assert_eq!(
            process.execute(),
            Err(WorkError::Panicked("bad work".into()))
        );
    }

    #[test]
    fn test_zero_quantum_is_exceeded_after_burst() {
        let mut process = noop(1, Duration::ZERO);
        process.execute().unwrap();
        assert!(process.has_exceeded_quantum());
    }

    #[test]
    fn test_quantum_expires_with_time() {
        let mut process = noop(1, Duration::from_millis(10));
        process.execute().unwrap();
        assert!(!process.has_exceeded_quantum());
        thread::sleep(Duration::from_millis(15));
        assert!(process.has_exceeded_quantum());
    }

    #[test]
    fn test_transition_validation() {
        let mut process = noop(3, Duration::from_millis(100));
        assert!(process.transition(ProcessState::Ready).is_ok());
        assert_eq!(
            process.transition(ProcessState::New),
            Err(ProcessError::InvalidStateTransition {
                pid: 3,
                from: ProcessState::Ready,
                to: ProcessState::New,
            })
        );
    }

    #[test]
    fn test_snapshot() {
        let mut process = noop(5, Duration::from_millis(20));
        process.set_parent(2);
        process.add_child(9);
        process.set_priority(4);

        let snap = process.snapshot();
        assert_eq!(snap.pid, 5);
        assert_eq!(snap.parent, Some(2));
        assert_eq!(snap.children, vec![9]);
        assert_eq!(snap.priority, 4);
        assert_eq!(snap.quantum(), Duration::from_millis(20));
    }
}
