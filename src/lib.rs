//! Correlation vectors: compact, sortable, hierarchical identifiers for
//! tracing causality across service boundaries.
//!
//! # Overview
//!
//! A correlation vector (cV) is a short string of the form
//! `<base>.<extension>[.<extension>...]` carried between services in the
//! `MS-CV` request header. The base identifies the logical trace origin;
//! each service hop appends or increments an ordinal segment, so the full
//! vector encodes the causal path of an operation without any coordination
//! between participants.
//!
//! # Core Guarantees
//!
//! - **Lock-free increments**: [`CorrelationVector::increment`] is a CAS
//!   retry loop; concurrent callers on a shared instance never observe
//!   duplicate or out-of-order extension values
//! - **Bounded growth**: a vector that would exceed its version's maximum
//!   serialized length freezes instead, marked by a trailing `!` terminator
//! - **Total parsing**: malformed inbound values degrade to usable fallback
//!   vectors by default; strict validation is opt-in per operation context
//! - **Injected capabilities**: randomness and wall-clock ticks flow through
//!   explicit [`EntropySource`] and [`TickSource`] handles, so every
//!   time/entropy-dependent path is deterministically testable
//!
//! # Module Structure
//!
//! - [`vector`]: the [`CorrelationVector`] value type and its operations
//! - [`version`]: wire-format versions (V1/V2) and their size limits
//! - [`spin`]: parameters for the Spin operator
//! - [`context`]: per-operation configuration and injected capabilities
//! - [`sink`]: bounded accumulator for non-fatal validation failures
//! - [`entropy`]: entropy source abstraction
//! - [`ticks`]: 100 ns tick source abstraction
//! - [`encoding`]: unpadded base64 rendering of vector bases
//! - [`error`]: error types
//!
//! # Example
//!
//! ```
//! use correlation_vector::CorrelationVector;
//!
//! // At the trace origin: mint a root vector.
//! let cv = CorrelationVector::new();
//!
//! // Before each outbound call: increment the extension.
//! let outbound = cv.increment();
//! assert!(outbound.ends_with(".1"));
//!
//! // At the next service: extend the inbound value into a new scope.
//! let next_hop = CorrelationVector::extend(&outbound);
//! assert_eq!(next_hop.value(), format!("{outbound}.0"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::doc_markdown)]

pub mod context;
pub mod encoding;
pub mod entropy;
pub mod error;
pub mod sink;
pub mod spin;
pub mod ticks;
pub mod vector;
pub mod version;

pub use context::{
    default_sink, set_validate_on_creation, validate_on_creation, CvContext, ErrorPolicy,
};
pub use entropy::{DetEntropy, EntropySource, OsEntropy};
pub use error::{AggregateError, CorrelationVectorError};
pub use sink::ErrorSink;
pub use spin::{SpinCounterInterval, SpinCounterPeriodicity, SpinEntropy, SpinParameters};
pub use ticks::{SystemTicks, TickSource, VirtualTicks};
pub use vector::{CorrelationVector, HEADER_NAME};
pub use version::Version;
