/*!
 * ID Generation
 * Monotonic PID allocation owned by a single process manager
 */

use super::limits::FIRST_PID;
use super::types::Pid;
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic PID generator
///
/// Each manager owns exactly one generator, there is no global counter.
/// IDs are never recycled: a terminated PID stays retired for the
/// lifetime of the generator.
#[derive(Debug)]
pub struct PidGenerator {
    counter: AtomicU64,
}

impl PidGenerator {
    /// Create new generator starting at given value
    #[inline]
    pub fn new(start: Pid) -> Self {
        Self {
            counter: AtomicU64::new(start),
        }
    }

    /// Allocate the next PID
    #[inline]
    pub fn next(&self) -> Pid {
        self.counter.fetch_add(1, Ordering::SeqCst)
    }

    /// Peek at the PID the next call to [`next`](Self::next) will return
    #[inline]
    pub fn peek(&self) -> Pid {
        self.counter.load(Ordering::Relaxed)
    }
}

impl Default for PidGenerator {
    fn default() -> Self {
        Self::new(FIRST_PID)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotonic_allocation() {
        let ids = PidGenerator::default();
        assert_eq!(ids.next(), 1);
        assert_eq!(ids.next(), 2);
        assert_eq!(ids.peek(), 3);
    }

    #[test]
    fn test_custom_start() {
        let ids = PidGenerator::new(100);
        assert_eq!(ids.next(), 100);
        assert_eq!(ids.next(), 101);
    }
}
