/*!
 * Lock-Free Scheduler Statistics
 * Atomic counters readable without taking the scheduler lock
 */

use crate::process::core::types::SchedulerStats;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Atomic scheduler statistics
///
/// All counters are monotonic for the lifetime of the owning manager.
/// Writers are serialized by the manager lock; readers take a snapshot
/// through a shared `Arc` without touching that lock.
#[repr(C, align(64))]
#[derive(Debug, Default)]
pub struct AtomicSchedulerStats {
    total_scheduled: AtomicU64,
    context_switches: AtomicU64,
    preemptions: AtomicU64,
    yields: AtomicU64,
    blocked: AtomicU64,
    unblocked: AtomicU64,
    terminated: AtomicU64,
    work_failures: AtomicU64,
    scheduling_time_micros: AtomicU64,
}

impl AtomicSchedulerStats {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hot path - called on every dispatch
    #[inline(always)]
    pub fn inc_scheduled(&self) {
        self.total_scheduled.fetch_add(1, Ordering::Relaxed);
    }

    /// Hot path - called on every dispatch and preemption
    #[inline(always)]
    pub fn inc_context_switches(&self) {
        self.context_switches.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_preemptions(&self) {
        self.preemptions.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_yields(&self) {
        self.yields.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn inc_blocked(&self) {
        self.blocked.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn inc_unblocked(&self) {
        self.unblocked.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn inc_terminated(&self) {
        self.terminated.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn inc_work_failures(&self) {
        self.work_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Hot path - called once per scheduling step
    #[inline(always)]
    pub fn add_scheduling_time(&self, elapsed: Duration) {
        self.scheduling_time_micros
            .fetch_add(elapsed.as_micros() as u64, Ordering::Relaxed);
    }

    /// Get snapshot of current stats
    ///
    /// # Note
    /// Each counter is read independently. Counters may be mutually
    /// inconsistent by one event if a step runs concurrently with the read.
    #[inline]
    pub fn snapshot(&self) -> SchedulerStats {
        SchedulerStats {
            total_scheduled: self.total_scheduled.load(Ordering::Relaxed),
            context_switches: self.context_switches.load(Ordering::Relaxed),
            preemptions: self.preemptions.load(Ordering::Relaxed),
            yields: self.yields.load(Ordering::Relaxed),
            blocked_count: self.blocked.load(Ordering::Relaxed),
            unblocked_count: self.unblocked.load(Ordering::Relaxed),
            terminated_count: self.terminated.load(Ordering::Relaxed),
            work_failures: self.work_failures.load(Ordering::Relaxed),
            total_scheduling_time_micros: self.scheduling_time_micros.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reflects_counters() {
        let stats = AtomicSchedulerStats::new();
        stats.inc_context_switches();
        stats.inc_context_switches();
        stats.inc_preemptions();
        stats.inc_blocked();
        stats.add_scheduling_time(Duration::from_micros(250));

        let snap = stats.snapshot();
        assert_eq!(snap.context_switches, 2);
        assert_eq!(snap.preemptions, 1);
        assert_eq!(snap.blocked_count, 1);
        assert_eq!(snap.unblocked_count, 0);
        assert_eq!(snap.total_scheduling_time(), Duration::from_micros(250));
    }
}
