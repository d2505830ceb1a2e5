//! Per-operation configuration and injected capabilities.
//!
//! Validation switches and the error accumulator flow through an explicit
//! [`CvContext`] passed to the `*_in` operations rather than hidden
//! process-wide globals, which keeps behavior testable without cross-test
//! interference. The infallible entry points (`extend`, `spin`, `parse`)
//! use [`CvContext::default`], which snapshots a compat process-wide
//! validate flag and shares a process-wide sink for callers that want the
//! historical global surface.

use crate::entropy::{EntropySource, OsEntropy};
use crate::error::CorrelationVectorError;
use crate::sink::ErrorSink;
use crate::ticks::{SystemTicks, TickSource};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

static VALIDATE_ON_CREATION: AtomicBool = AtomicBool::new(false);
static DEFAULT_SINK: OnceLock<Arc<ErrorSink>> = OnceLock::new();

/// Sets the process-wide default for validate-on-creation.
///
/// Affects only contexts constructed after the call; each
/// [`CvContext::default`] snapshots the flag.
pub fn set_validate_on_creation(enabled: bool) {
    VALIDATE_ON_CREATION.store(enabled, Ordering::Release);
}

/// Current process-wide default for validate-on-creation.
#[must_use]
pub fn validate_on_creation() -> bool {
    VALIDATE_ON_CREATION.load(Ordering::Acquire)
}

/// The process-wide sink shared by default contexts.
#[must_use]
pub fn default_sink() -> Arc<ErrorSink> {
    DEFAULT_SINK
        .get_or_init(|| Arc::new(ErrorSink::new()))
        .clone()
}

/// What to do with a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Record the error in the sink and proceed with a best-effort value.
    #[default]
    Report,
    /// Fail the operation immediately.
    Strict,
}

/// Operation context: validation switches plus the entropy and tick
/// capabilities consumed by base generation and Spin.
#[derive(Debug, Clone)]
pub struct CvContext {
    validate: bool,
    policy: ErrorPolicy,
    sink: Arc<ErrorSink>,
    entropy: Arc<dyn EntropySource>,
    ticks: Arc<dyn TickSource>,
}

impl Default for CvContext {
    fn default() -> Self {
        Self {
            validate: validate_on_creation(),
            policy: ErrorPolicy::Report,
            sink: default_sink(),
            entropy: Arc::new(OsEntropy),
            ticks: Arc::new(SystemTicks),
        }
    }
}

impl CvContext {
    /// A context with the process-wide defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A validating context with the strict (fail-fast) policy.
    #[must_use]
    pub fn strict() -> Self {
        Self::default().with_validation(true).with_policy(ErrorPolicy::Strict)
    }

    /// Returns a copy with validation enabled or disabled.
    #[must_use]
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// Returns a copy with the given error policy.
    #[must_use]
    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns a copy reporting to the given sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<ErrorSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Returns a copy drawing entropy from the given source.
    #[must_use]
    pub fn with_entropy(mut self, entropy: Arc<dyn EntropySource>) -> Self {
        self.entropy = entropy;
        self
    }

    /// Returns a copy reading ticks from the given source.
    #[must_use]
    pub fn with_ticks(mut self, ticks: Arc<dyn TickSource>) -> Self {
        self.ticks = ticks;
        self
    }

    /// Whether operations validate inbound values.
    #[must_use]
    pub fn validate(&self) -> bool {
        self.validate
    }

    /// The policy applied to validation failures.
    #[must_use]
    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    /// The sink receiving reported errors.
    #[must_use]
    pub fn sink(&self) -> &ErrorSink {
        &self.sink
    }

    pub(crate) fn entropy_source(&self) -> &dyn EntropySource {
        self.entropy.as_ref()
    }

    pub(crate) fn tick_source(&self) -> &dyn TickSource {
        self.ticks.as_ref()
    }

    /// Routes a validation failure per the policy: strict fails, report
    /// records and continues.
    pub(crate) fn route(&self, error: CorrelationVectorError) -> Result<(), CorrelationVectorError> {
        match self.policy {
            ErrorPolicy::Strict => Err(error),
            ErrorPolicy::Report => {
                tracing::warn!(error = %error, "malformed correlation vector");
                self.sink.report(error);
                Ok(())
            }
        }
    }
}
