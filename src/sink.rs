//! Bounded accumulator for non-fatal validation failures.
//!
//! Under the report policy, malformed-input errors are recorded here
//! instead of interrupting control flow; callers inspect or drain the sink
//! when convenient. Retention is bounded FIFO: when the sink exceeds its
//! configured capacity, the oldest entries are discarded first.
//!
//! The sink is an injectable value, not a hidden static. Tests create a
//! fresh instance per case; production code typically shares one via
//! [`default_sink`](crate::context::default_sink).

use crate::error::{AggregateError, CorrelationVectorError};
use crossbeam_queue::SegQueue;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Upper bound on the configurable capacity.
const MAX_SAVED_ERRORS_LIMIT: usize = 100;

/// Concurrency-safe bounded FIFO of validation errors.
///
/// The count is tracked alongside the lock-free queue; under concurrent
/// reporting it may transiently overshoot the capacity before the purge
/// catches up, which only affects how many entries survive, never safety.
#[derive(Debug)]
pub struct ErrorSink {
    errors: SegQueue<CorrelationVectorError>,
    saved: AtomicUsize,
    max_saved: AtomicUsize,
}

impl ErrorSink {
    /// Creates a sink that retains a single error.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(1)
    }

    /// Creates a sink with the given capacity, clamped to `0..=100`.
    ///
    /// A capacity of zero drops every report.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            errors: SegQueue::new(),
            saved: AtomicUsize::new(0),
            max_saved: AtomicUsize::new(capacity.min(MAX_SAVED_ERRORS_LIMIT)),
        }
    }

    /// Records an error, discarding the oldest entries beyond capacity.
    pub fn report(&self, error: CorrelationVectorError) {
        if self.max_saved.load(Ordering::Acquire) == 0 {
            return;
        }
        self.errors.push(error);
        self.saved.fetch_add(1, Ordering::AcqRel);
        self.purge();
    }

    fn purge(&self) {
        while self.saved.load(Ordering::Acquire) > self.max_saved.load(Ordering::Acquire) {
            if self.errors.pop().is_some() {
                self.saved.fetch_sub(1, Ordering::AcqRel);
            } else {
                break;
            }
        }
    }

    /// True if any operation has reported an error since the last drain.
    #[must_use]
    pub fn has_saved_errors(&self) -> bool {
        self.saved.load(Ordering::Acquire) > 0
    }

    /// Number of currently retained errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.saved.load(Ordering::Acquire)
    }

    /// True if no errors are retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.has_saved_errors()
    }

    /// The maximum number of errors retained between drains.
    #[must_use]
    pub fn max_saved_errors(&self) -> usize {
        self.max_saved.load(Ordering::Acquire)
    }

    /// Sets the retention capacity, clamped to `0..=100`.
    ///
    /// Shrinking below the current count discards the oldest entries.
    pub fn set_max_saved_errors(&self, capacity: usize) {
        self.max_saved
            .store(capacity.min(MAX_SAVED_ERRORS_LIMIT), Ordering::Release);
        self.purge();
    }

    /// Atomically empties the sink.
    ///
    /// Returns `Err` with every drained error bundled into one
    /// [`AggregateError`], or `Ok(())` if the sink was empty.
    ///
    /// # Errors
    ///
    /// Fails exactly when at least one error was retained.
    pub fn drain(&self) -> Result<(), AggregateError> {
        let mut drained = Vec::new();
        while let Some(error) = self.errors.pop() {
            self.saved.fetch_sub(1, Ordering::AcqRel);
            drained.push(error);
        }
        if drained.is_empty() {
            Ok(())
        } else {
            Err(AggregateError::new(drained))
        }
    }

    /// Discards all retained errors.
    pub fn clear(&self) {
        while self.errors.pop().is_some() {}
        self.saved.store(0, Ordering::Release);
    }
}

impl Default for ErrorSink {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment_error(tag: &str) -> CorrelationVectorError {
        CorrelationVectorError::TooFewSegments {
            value: tag.to_string(),
        }
    }

    #[test]
    fn retains_newest_within_capacity() {
        let sink = ErrorSink::with_capacity(2);
        sink.report(segment_error("a"));
        sink.report(segment_error("b"));
        sink.report(segment_error("c"));

        let aggregate = sink.drain().expect_err("two errors retained");
        assert_eq!(
            aggregate.errors(),
            &[segment_error("b"), segment_error("c")]
        );
        assert!(sink.is_empty());
    }

    #[test]
    fn zero_capacity_drops_reports() {
        let sink = ErrorSink::with_capacity(0);
        sink.report(segment_error("a"));
        assert!(!sink.has_saved_errors());
        assert!(sink.drain().is_ok());
    }

    #[test]
    fn capacity_is_clamped() {
        let sink = ErrorSink::with_capacity(1000);
        assert_eq!(sink.max_saved_errors(), 100);

        sink.set_max_saved_errors(250);
        assert_eq!(sink.max_saved_errors(), 100);
    }

    #[test]
    fn shrinking_discards_oldest() {
        let sink = ErrorSink::with_capacity(3);
        sink.report(segment_error("a"));
        sink.report(segment_error("b"));
        sink.report(segment_error("c"));

        sink.set_max_saved_errors(1);
        let aggregate = sink.drain().expect_err("one error retained");
        assert_eq!(aggregate.errors(), &[segment_error("c")]);
    }

    #[test]
    fn drain_on_empty_is_ok() {
        let sink = ErrorSink::new();
        assert!(sink.drain().is_ok());
    }

    #[test]
    fn clear_resets_state() {
        let sink = ErrorSink::with_capacity(5);
        sink.report(segment_error("a"));
        sink.clear();
        assert!(sink.is_empty());
        assert!(sink.drain().is_ok());
    }

    #[test]
    fn default_capacity_is_one() {
        let sink = ErrorSink::new();
        sink.report(segment_error("a"));
        sink.report(segment_error("b"));
        assert_eq!(sink.len(), 1);
    }
}
