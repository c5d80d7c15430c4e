/*!
 * Process Module
 * Process entities, scheduling, and lifecycle management
 */

pub mod context;
pub mod core;
pub mod entry;
pub mod listing;
pub mod manager;
pub mod manager_builder;
pub mod scheduler;
pub mod table;

// Re-export for convenience
pub use self::core::traits::{from_fn, FnWork, NoopWork, Work};
pub use self::core::types::{
    ListEntry, ProcessError, ProcessResult, ProcessSnapshot, ProcessState, ProcessStatistics,
    ScheduleOutcome, SchedulerStats, WorkError,
};
pub use context::ExecutionContext;
pub use entry::Process;
pub use manager::ProcessManager;
pub use manager_builder::ProcessManagerBuilder;
pub use scheduler::Scheduler;
pub use table::ProcessTable;
