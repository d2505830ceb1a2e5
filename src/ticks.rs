//! Tick source abstraction for the Spin operator.
//!
//! Spin derives its time-disambiguation counter from a count of 100 ns
//! ticks since the Unix epoch. The trait allows the wall clock to be
//! swapped for a manually advanced source, enabling deterministic tests
//! of Spin's ordering behavior.

use core::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of 100 ns ticks elapsed since the Unix epoch.
pub trait TickSource: fmt::Debug + Send + Sync {
    /// Returns the current tick count.
    ///
    /// Successive reads are expected to be non-decreasing.
    fn ticks_since_epoch(&self) -> u64;
}

/// Wall-clock tick source for production use.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTicks;

impl TickSource for SystemTicks {
    fn ticks_since_epoch(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| (elapsed.as_nanos() / 100) as u64)
    }
}

/// Manually advanced tick source for deterministic tests.
///
/// Ticks only move when explicitly told to.
///
/// # Example
///
/// ```
/// use correlation_vector::{TickSource, VirtualTicks};
///
/// let ticks = VirtualTicks::new();
/// assert_eq!(ticks.ticks_since_epoch(), 0);
///
/// ticks.advance(1 << 24);
/// assert_eq!(ticks.ticks_since_epoch(), 1 << 24);
/// ```
#[derive(Debug, Default)]
pub struct VirtualTicks {
    now: AtomicU64,
}

impl VirtualTicks {
    /// Creates a virtual tick source starting at zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: AtomicU64::new(0),
        }
    }

    /// Creates a virtual tick source starting at the given tick count.
    #[must_use]
    pub fn starting_at(ticks: u64) -> Self {
        Self {
            now: AtomicU64::new(ticks),
        }
    }

    /// Advances the tick count by the given amount.
    pub fn advance(&self, ticks: u64) {
        self.now.fetch_add(ticks, Ordering::Release);
    }

    /// Sets the tick count to an absolute value.
    pub fn set(&self, ticks: u64) {
        self.now.store(ticks, Ordering::Release);
    }
}

impl TickSource for VirtualTicks {
    fn ticks_since_epoch(&self) -> u64 {
        self.now.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_ticks_are_nonzero_and_nondecreasing() {
        let source = SystemTicks;
        let first = source.ticks_since_epoch();
        let second = source.ticks_since_epoch();
        assert!(first > 0);
        assert!(second >= first);
    }

    #[test]
    fn virtual_ticks_advance_and_set() {
        let ticks = VirtualTicks::starting_at(100);
        assert_eq!(ticks.ticks_since_epoch(), 100);

        ticks.advance(50);
        assert_eq!(ticks.ticks_since_epoch(), 150);

        ticks.set(7);
        assert_eq!(ticks.ticks_since_epoch(), 7);
    }
}
