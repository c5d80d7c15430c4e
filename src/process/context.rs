/*!
 * Execution Context
 * Per-process run time bookkeeping and free-form slot storage
 */

use crate::core::limits::DEFAULT_TIME_QUANTUM;
use crate::core::types::{SlotName, SlotValue};
use std::collections::HashMap;
use std::time::Duration;

/// Per-process execution bookkeeping, owned 1:1 by its process
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    accumulated_run_time: Duration,
    time_quantum: Duration,
    burst_count: u64,
    // Opaque to the scheduler
    slots: HashMap<SlotName, SlotValue>,
}

impl ExecutionContext {
    pub fn new(time_quantum: Duration) -> Self {
        Self {
            accumulated_run_time: Duration::ZERO,
            time_quantum,
            burst_count: 0,
            slots: HashMap::new(),
        }
    }

    /// Fold one finished burst into the totals
    #[inline]
    pub(crate) fn record_burst(&mut self, elapsed: Duration) {
        self.accumulated_run_time = self.accumulated_run_time.saturating_add(elapsed);
        self.burst_count += 1;
    }

    #[inline]
    pub fn accumulated_run_time(&self) -> Duration {
        self.accumulated_run_time
    }

    #[inline]
    pub fn time_quantum(&self) -> Duration {
        self.time_quantum
    }

    #[inline]
    pub fn set_time_quantum(&mut self, quantum: Duration) {
        self.time_quantum = quantum;
    }

    #[inline]
    pub fn burst_count(&self) -> u64 {
        self.burst_count
    }

    pub fn slot(&self, name: &str) -> Option<&SlotValue> {
        self.slots.get(name)
    }

    /// Store a slot value, returning the previous one
    pub fn set_slot(&mut self, name: impl Into<SlotName>, value: SlotValue) -> Option<SlotValue> {
        self.slots.insert(name.into(), value)
    }

    pub fn remove_slot(&mut self, name: &str) -> Option<SlotValue> {
        self.slots.remove(name)
    }

    pub fn slots(&self) -> impl Iterator<Item = (&SlotName, &SlotValue)> {
        self.slots.iter()
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_QUANTUM)
    }
}
