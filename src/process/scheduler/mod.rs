/*!
 * CPU Scheduler
 * Cooperative round-robin scheduling with quantum-based preemption
 */

use super::core::types::SchedulerStats;
use crate::core::limits::SLOW_BURST_WARNING;
use crate::core::types::Pid;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;

mod atomic_stats;
mod operations;

pub use atomic_stats::AtomicSchedulerStats;

/// Location of a process in the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QueueLocation {
    Running,
    Ready,
    Blocked,
}

/// CPU Scheduler
///
/// Holds PIDs only; the processes themselves live in the manager's
/// [`ProcessTable`](super::table::ProcessTable), which is passed into every
/// operation. Both are guarded by the same manager lock, so the scheduler
/// itself carries no synchronization beyond its shared statistics.
///
/// Every scheduled PID is in exactly one of the ready queue, the blocked
/// set or the running slot, tracked by a location index for O(1) lookup.
#[derive(Debug)]
pub struct Scheduler {
    // FIFO, priority never reorders it
    ready_queue: VecDeque<Pid>,
    blocked: HashSet<Pid>,
    running: Option<Pid>,
    locations: HashMap<Pid, QueueLocation>,
    stats: Arc<AtomicSchedulerStats>,
    slow_burst_warning: Duration,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            ready_queue: VecDeque::new(),
            blocked: HashSet::new(),
            running: None,
            locations: HashMap::new(),
            stats: Arc::new(AtomicSchedulerStats::new()),
            slow_burst_warning: SLOW_BURST_WARNING,
        }
    }

    /// Bursts longer than `threshold` are logged at warn level
    #[must_use]
    pub fn with_slow_burst_warning(mut self, threshold: Duration) -> Self {
        self.slow_burst_warning = threshold;
        self
    }

    /// Get scheduler statistics (lock-free snapshot)
    pub fn stats(&self) -> SchedulerStats {
        self.stats.snapshot()
    }

    /// Shared handle to the statistics counters
    pub fn stats_handle(&self) -> Arc<AtomicSchedulerStats> {
        Arc::clone(&self.stats)
    }

    /// Process currently holding the running slot
    #[inline]
    pub fn current(&self) -> Option<Pid> {
        self.running
    }

    /// Ready queue from head to tail
    pub fn ready_queue(&self) -> Vec<Pid> {
        self.ready_queue.iter().copied().collect()
    }

    /// Blocked set in PID order
    pub fn blocked(&self) -> Vec<Pid> {
        let mut pids: Vec<Pid> = self.blocked.iter().copied().collect();
        pids.sort_unstable();
        pids
    }

    #[inline]
    pub fn contains(&self, pid: Pid) -> bool {
        self.locations.contains_key(&pid)
    }

    /// Number of processes known to the scheduler
    #[inline]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
