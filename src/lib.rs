/*!
 * Cooperative Kernel Library
 * Process scheduling and lifecycle management exposed as a library
 */

pub mod core;
pub mod monitoring;
pub mod process;
pub mod shell;

// Re-exports
pub use crate::core::config::{ConfigError, SchedulerConfig};
pub use crate::core::types::{Pid, Priority};
pub use monitoring::init_tracing;
pub use process::{
    from_fn, ListEntry, NoopWork, ProcessError, ProcessManager, ProcessManagerBuilder,
    ProcessResult, ProcessSnapshot, ProcessState, ProcessStatistics, ScheduleOutcome,
    SchedulerStats, Work, WorkError,
};
pub use shell::{Command, Reply, Shell, ShellError};
