/*!
 * Scheduler Configuration
 *
 * Runtime configuration for process defaults, loadable from the environment
 */

use super::limits::{
    DEFAULT_PRIORITY, DEFAULT_TIME_QUANTUM, ENV_DEFAULT_PRIORITY, ENV_QUANTUM_MS,
    ENV_SLOW_BURST_MS, SLOW_BURST_WARNING,
};
use super::types::Priority;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: '{value}' ({reason})")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Scheduler configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SchedulerConfig {
    /// Quantum assigned to every new process
    #[serde(with = "crate::core::serde::duration_millis")]
    pub default_quantum: Duration,
    /// Priority used by `create_process` when none is given
    pub default_priority: Priority,
    /// Bursts longer than this are logged at warn level
    #[serde(with = "crate::core::serde::duration_millis")]
    pub slow_burst_warning: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            default_quantum: DEFAULT_TIME_QUANTUM,
            default_priority: DEFAULT_PRIORITY,
            slow_burst_warning: SLOW_BURST_WARNING,
        }
    }
}

impl SchedulerConfig {
    #[must_use]
    pub fn with_quantum(mut self, quantum: Duration) -> Self {
        self.default_quantum = quantum;
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.default_priority = priority;
        self
    }

    #[must_use]
    pub fn with_slow_burst_warning(mut self, threshold: Duration) -> Self {
        self.slow_burst_warning = threshold;
        self
    }

    /// Load configuration from the process environment
    ///
    /// Environment variables:
    /// - KERNEL_QUANTUM_MS: default time quantum (default: 100)
    /// - KERNEL_DEFAULT_PRIORITY: default priority (default: 1)
    /// - KERNEL_SLOW_BURST_MS: slow burst warning threshold (default: 1000)
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_QUANTUM_MS) {
            config.default_quantum = Duration::from_millis(parse_var(ENV_QUANTUM_MS, &raw)?);
        }
        if let Some(raw) = lookup(ENV_DEFAULT_PRIORITY) {
            config.default_priority = parse_var(ENV_DEFAULT_PRIORITY, &raw)?;
        }
        if let Some(raw) = lookup(ENV_SLOW_BURST_MS) {
            config.slow_burst_warning =
                Duration::from_millis(parse_var(ENV_SLOW_BURST_MS, &raw)?);
        }

        Ok(config)
    }
}

fn parse_var<T>(var: &'static str, raw: &str) -> ConfigResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidValue {
            var,
            value: raw.to_string(),
            reason: e.to_string(),
        })
}
