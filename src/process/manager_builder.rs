/*!
 * Process Manager Builder
 * Builder pattern for ProcessManager construction
 */

use super::manager::ProcessManager;
use crate::core::config::SchedulerConfig;
use crate::core::id::PidGenerator;
use crate::core::limits::FIRST_PID;
use crate::core::types::{Pid, Priority};
use std::time::Duration;

/// Builder for ProcessManager
#[derive(Debug, Clone)]
pub struct ProcessManagerBuilder {
    config: SchedulerConfig,
    first_pid: Pid,
}

impl ProcessManagerBuilder {
    /// Create a new ProcessManager builder
    pub fn new() -> Self {
        Self {
            config: SchedulerConfig::default(),
            first_pid: FIRST_PID,
        }
    }

    /// Start from an existing configuration
    pub fn with_config(mut self, config: SchedulerConfig) -> Self {
        self.config = config;
        self
    }

    /// Quantum assigned to every new process
    pub fn with_quantum(mut self, quantum: Duration) -> Self {
        self.config.default_quantum = quantum;
        self
    }

    /// Priority used by `spawn` and child creation
    pub fn with_default_priority(mut self, priority: Priority) -> Self {
        self.config.default_priority = priority;
        self
    }

    /// Threshold above which a single burst is logged as slow
    pub fn with_slow_burst_warning(mut self, threshold: Duration) -> Self {
        self.config.slow_burst_warning = threshold;
        self
    }

    /// First PID handed out
    pub fn with_first_pid(mut self, pid: Pid) -> Self {
        self.first_pid = pid;
        self
    }

    /// Build the ProcessManager
    pub fn build(self) -> ProcessManager {
        ProcessManager::from_parts(self.config, PidGenerator::new(self.first_pid))
    }
}

impl Default for ProcessManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
