/*!
 * System Limits and Constants
 *
 * Centralized location for scheduler-wide defaults and thresholds.
 */

use std::time::Duration;

// =============================================================================
// SCHEDULING
// =============================================================================

/// Default time quantum (100ms)
/// Maximum wall-clock time a process may hold the running slot before preemption
pub const DEFAULT_TIME_QUANTUM: Duration = Duration::from_millis(100);

/// Default priority for newly created processes
pub const DEFAULT_PRIORITY: i32 = 1;

/// First PID handed out by a fresh process manager
pub const FIRST_PID: u64 = 1;

/// Burst duration above which a warning is logged (1s)
/// There is no watchdog, a runaway burst stalls the whole scheduler
pub const SLOW_BURST_WARNING: Duration = Duration::from_secs(1);

// =============================================================================
// ENVIRONMENT
// =============================================================================

/// Overrides the default quantum, in milliseconds
pub const ENV_QUANTUM_MS: &str = "KERNEL_QUANTUM_MS";

/// Overrides the default priority for new processes
pub const ENV_DEFAULT_PRIORITY: &str = "KERNEL_DEFAULT_PRIORITY";

/// Overrides the slow burst warning threshold, in milliseconds
pub const ENV_SLOW_BURST_MS: &str = "KERNEL_SLOW_BURST_MS";

/// Enables JSON trace output when set to `1` or `true`
pub const ENV_TRACE_JSON: &str = "KERNEL_TRACE_JSON";
