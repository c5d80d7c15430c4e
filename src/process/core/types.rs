/*!
 * Process Types
 * Common types for process management
 */

use crate::core::serde::{as_display, is_none, is_zero_u64};
use crate::core::types::{Pid, Priority};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use time::OffsetDateTime;

/// Process operation result
pub type ProcessResult<T> = Result<T, ProcessError>;

/// Process errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum ProcessError {
    #[error("Process {0} not found")]
    #[diagnostic(
        code(process::not_found),
        help("The process may have terminated or never existed. Check PID validity.")
    )]
    NotFound(Pid),

    #[error("Process {pid} is already scheduled ({state})")]
    #[diagnostic(
        code(process::already_scheduled),
        help("A process can only live in one scheduler queue at a time.")
    )]
    AlreadyScheduled { pid: Pid, state: ProcessState },

    #[error("Invalid state transition for process {pid}: {from} -> {to}")]
    #[diagnostic(code(process::invalid_transition))]
    InvalidStateTransition {
        pid: Pid,
        from: ProcessState,
        to: ProcessState,
    },

    #[error("Work of process {pid} failed: {source}")]
    #[diagnostic(
        code(process::work_failed),
        help("The process was terminated, other processes are unaffected.")
    )]
    WorkFailed {
        pid: Pid,
        #[source]
        source: WorkError,
    },
}

/// Failure raised by a unit of work during a burst
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkError {
    #[error("{0}")]
    Failed(String),

    #[error("panicked: {0}")]
    Panicked(String),
}

impl WorkError {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }
}

/// Process state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    /// Process is constructed but not yet admitted
    New,
    /// Process waits in the ready queue
    Ready,
    /// Process holds the running slot
    Running,
    /// Process sits in the blocked set
    Blocked,
    /// Process has terminated and is never rescheduled
    Terminated,
}

impl ProcessState {
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Ready => "ready",
            Self::Running => "running",
            Self::Blocked => "blocked",
            Self::Terminated => "terminated",
        }
    }

    /// Whether the state machine allows moving from `self` to `to`
    ///
    /// `New → Ready → Running → {Ready | Blocked | Terminated}`,
    /// `Ready → Blocked`, `Blocked → Ready`, anything but `Terminated → Terminated`.
    pub const fn can_transition_to(&self, to: ProcessState) -> bool {
        use ProcessState::*;
        matches!(
            (self, to),
            (New, Ready)
                | (Ready, Running)
                | (Ready, Blocked)
                | (Running, Ready)
                | (Running, Blocked)
                | (Blocked, Ready)
                | (New | Ready | Running | Blocked, Terminated)
        )
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Read-only view of a process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProcessSnapshot {
    pub pid: Pid,
    pub name: String,
    pub state: ProcessState,
    pub priority: Priority,
    #[serde(skip_serializing_if = "is_none")]
    pub parent: Option<Pid>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub children: Vec<Pid>,
    #[serde(skip_serializing_if = "is_zero_u64", default)]
    pub cpu_time_micros: u64,
    #[serde(skip_serializing_if = "is_zero_u64", default)]
    pub burst_count: u64,
    pub quantum_micros: u64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl ProcessSnapshot {
    pub fn cpu_time(&self) -> Duration {
        Duration::from_micros(self.cpu_time_micros)
    }

    pub fn cpu_time_ms(&self) -> f64 {
        self.cpu_time_micros as f64 / 1000.0
    }

    pub fn quantum(&self) -> Duration {
        Duration::from_micros(self.quantum_micros)
    }
}

/// Formats the `pinfo` view
impl fmt::Display for ProcessSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PID:      {}", self.pid)?;
        writeln!(f, "Name:     {}", self.name)?;
        writeln!(f, "State:    {}", self.state)?;
        writeln!(f, "Priority: {}", self.priority)?;
        writeln!(f, "CPU time: {:.3} ms", self.cpu_time_ms())?;
        write!(f, "Children: {}", self.children.len())
    }
}

/// One row of a process tree listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListEntry {
    /// Nesting depth, 0 for top-level processes
    pub depth: usize,
    pub process: ProcessSnapshot,
}

/// Current process counts by state, recomputed on every call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProcessStatistics {
    pub total: usize,
    pub ready: usize,
    pub running: usize,
    pub blocked: usize,
}

/// Scheduler statistics, monotonic for the lifetime of a manager
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SchedulerStats {
    #[serde(skip_serializing_if = "is_zero_u64", default)]
    pub total_scheduled: u64,
    #[serde(skip_serializing_if = "is_zero_u64", default)]
    pub context_switches: u64,
    #[serde(skip_serializing_if = "is_zero_u64", default)]
    pub preemptions: u64,
    #[serde(skip_serializing_if = "is_zero_u64", default)]
    pub yields: u64,
    #[serde(skip_serializing_if = "is_zero_u64", default)]
    pub blocked_count: u64,
    #[serde(skip_serializing_if = "is_zero_u64", default)]
    pub unblocked_count: u64,
    #[serde(skip_serializing_if = "is_zero_u64", default)]
    pub terminated_count: u64,
    #[serde(skip_serializing_if = "is_zero_u64", default)]
    pub work_failures: u64,
    #[serde(skip_serializing_if = "is_zero_u64", default)]
    pub total_scheduling_time_micros: u64,
}

impl SchedulerStats {
    pub fn total_scheduling_time(&self) -> Duration {
        Duration::from_micros(self.total_scheduling_time_micros)
    }
}

/// Formats the `pstat` view
impl fmt::Display for SchedulerStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Context switches: {}", self.context_switches)?;
        writeln!(f, "Preemptions:      {}", self.preemptions)?;
        write!(f, "Blocked:          {}", self.blocked_count)
    }
}

/// Result of a single scheduling step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ScheduleOutcome {
    /// Nothing running, nothing ready
    Idle,
    /// A process was taken from the ready queue and ran one burst
    Dispatched { pid: Pid },
    /// The running process kept its slot and ran another burst
    Continued { pid: Pid },
    /// The burst failed and the process was terminated
    ///
    /// `error` is always [`ProcessError::WorkFailed`].
    Failed {
        pid: Pid,
        #[serde(serialize_with = "as_display")]
        error: ProcessError,
    },
}

impl ScheduleOutcome {
    /// PID of the process that ran a burst during this step
    pub fn pid(&self) -> Option<Pid> {
        match self {
            Self::Idle => None,
            Self::Dispatched { pid } | Self::Continued { pid } | Self::Failed { pid, .. } => {
                Some(*pid)
            }
        }
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Error that terminated the process, if the burst failed
    pub fn error(&self) -> Option<&ProcessError> {
        match self {
            Self::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    /// True if the burst failed by panicking
    pub fn panicked(&self) -> bool {
        matches!(
            self,
            Self::Failed {
                error: ProcessError::WorkFailed {
                    source: WorkError::Panicked(_),
                    ..
                },
                ..
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_machine_transitions() {
        use ProcessState::*;
        assert!(New.can_transition_to(Ready));
        assert!(Ready.can_transition_to(Running));
        assert!(Running.can_transition_to(Ready));
        assert!(Running.can_transition_to(Blocked));
        assert!(Blocked.can_transition_to(Ready));
        assert!(Blocked.can_transition_to(Terminated));

        assert!(!New.can_transition_to(Running));
        assert!(!Blocked.can_transition_to(Running));
        assert!(!Terminated.can_transition_to(Ready));
        assert!(!Terminated.can_transition_to(Terminated));
    }

    #[test]
    fn test_outcome_pid() {
        assert_eq!(ScheduleOutcome::Idle.pid(), None);
        assert_eq!(ScheduleOutcome::Dispatched { pid: 4 }.pid(), Some(4));
        assert!(ScheduleOutcome::Idle.is_idle());
    }

    #[test]
    fn test_failed_outcome_carries_work_error() {
        let outcome = ScheduleOutcome::Failed {
            pid: 3,
            error: ProcessError::WorkFailed {
                pid: 3,
                source: WorkError::Panicked("overflow".into()),
            },
        };
        assert_eq!(outcome.pid(), Some(3));
        assert!(outcome.panicked());
        assert!(matches!(
            outcome.error(),
            Some(ProcessError::WorkFailed { pid: 3, .. })
        ));

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"], "failed");
        assert_eq!(json["error"], "Work of process 3 failed: panicked: overflow");
    }

    #[test]
    fn test_stats_serialization_skips_zero_counters() {
        let stats = SchedulerStats {
            context_switches: 2,
            ..Default::default()
        };
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["context_switches"], 2);
        assert!(json.get("preemptions").is_none());
    }
}
