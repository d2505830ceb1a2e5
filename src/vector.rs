//! The correlation vector value type.
//!
//! A vector is a fixed base string plus a lock-free extension counter. It
//! is created by [`CorrelationVector::parse`], [`CorrelationVector::extend`],
//! [`CorrelationVector::spin`], or one of the root constructors, and mutated
//! only by [`CorrelationVector::increment`]. Once a vector reaches its
//! version's maximum serialized length it latches immutable and renders with
//! a trailing `!`; every later growth attempt returns the frozen value.

use crate::context::CvContext;
use crate::encoding;
use crate::entropy::EntropySource;
use crate::error::CorrelationVectorError;
use crate::spin::SpinParameters;
use crate::ticks::TickSource;
use crate::version::Version;
use core::fmt;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use uuid::Uuid;

/// Header used between services to pass the correlation vector.
pub const HEADER_NAME: &str = "MS-CV";

/// Separates the base from extension segments.
pub(crate) const DELIMITER: char = '.';

/// Marks a vector that has reached its maximum length and is frozen.
pub(crate) const TERMINATOR: char = '!';

/// Largest value an extension segment may carry on the wire.
const MAX_EXTENSION: u32 = i32::MAX as u32;

/// A lightweight vector for identifying and measuring causality.
#[derive(Debug)]
pub struct CorrelationVector {
    base: String,
    version: Version,
    extension: AtomicU32,
    immutable: AtomicBool,
}

impl CorrelationVector {
    fn from_parts(base: String, extension: u32, version: Version, immutable: bool) -> Self {
        let immutable = immutable || is_oversized(&base, extension, version);
        Self {
            base,
            version,
            extension: AtomicU32::new(extension),
            immutable: AtomicBool::new(immutable),
        }
    }

    /// Mints a V1 root vector.
    ///
    /// Call this only when no correlation vector was found in the inbound
    /// message header.
    #[must_use]
    pub fn new() -> Self {
        Self::root(Version::V1)
    }

    /// Mints a root vector of the given version using OS entropy.
    #[must_use]
    pub fn root(version: Version) -> Self {
        Self::root_in(version, &CvContext::default())
    }

    /// Mints a root vector drawing entropy from the given context.
    #[must_use]
    pub fn root_in(version: Version, ctx: &CvContext) -> Self {
        let base = generate_base(version, ctx.entropy_source());
        Self::from_parts(base, 0, version, false)
    }

    /// Mints a V2 vector rooted at a caller-supplied 128-bit value.
    ///
    /// Useful for correlating with an identifier that is already known
    /// outside the tracing system.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        let base = render_base(uuid.as_bytes(), Version::V2);
        Self::from_parts(base, 0, Version::V2, false)
    }

    /// Creates a vector by parsing its string representation.
    ///
    /// Parsing is total: a blank input, a missing delimiter, or a trailing
    /// segment outside `0..=i32::MAX` all fall back to a fresh V1 root. A
    /// trailing terminator marks the result immutable.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if !value.trim().is_empty() {
            let immutable = is_terminated(value);
            let content = if immutable {
                &value[..value.len() - TERMINATOR.len_utf8()]
            } else {
                value
            };
            if let Some(position) = content.rfind(DELIMITER) {
                if position > 0 {
                    if let Ok(extension) = content[position + 1..].parse::<u32>() {
                        if extension <= MAX_EXTENSION {
                            return Self::from_parts(
                                content[..position].to_string(),
                                extension,
                                Version::infer(value),
                                immutable,
                            );
                        }
                    }
                }
            }
        }
        Self::new()
    }

    /// Creates a new vector by extending an inbound value.
    ///
    /// This should be done at the entry point of an operation; the result
    /// serializes as `<value>.0`. Never fails: with the default context,
    /// validation failures are reported, not raised.
    #[must_use]
    pub fn extend(value: &str) -> Self {
        Self::extend_in(value, &CvContext::default()).unwrap_or_else(|_| Self::parse(value))
    }

    /// Creates a new vector by extending an inbound value under the given
    /// context.
    ///
    /// # Errors
    ///
    /// Fails only when the context validates with the strict policy and
    /// `value` is malformed.
    pub fn extend_in(value: &str, ctx: &CvContext) -> Result<Self, CorrelationVectorError> {
        if is_terminated(value) {
            return Ok(Self::parse(value));
        }

        let version = Version::infer(value);
        if ctx.validate() {
            if let Err(error) = validate(value, version) {
                ctx.route(error)?;
            }
        }

        if is_oversized(value, 0, version) {
            tracing::debug!(vector = value, "extend would overflow; freezing input");
            return Ok(Self::parse(&format!("{value}{TERMINATOR}")));
        }

        Ok(Self::from_parts(value.to_string(), 0, version, false))
    }

    /// Creates a new vector by applying the Spin operator with default
    /// parameters to an inbound value.
    ///
    /// This should be done at the entry point of an operation.
    #[must_use]
    pub fn spin(value: &str) -> Self {
        Self::spin_with(value, &SpinParameters::default())
    }

    /// Creates a new vector by applying the Spin operator with the given
    /// parameters.
    #[must_use]
    pub fn spin_with(value: &str, parameters: &SpinParameters) -> Self {
        Self::spin_in(value, parameters, &CvContext::default())
            .unwrap_or_else(|_| Self::parse(value))
    }

    /// Creates a new vector by applying the Spin operator under the given
    /// context.
    ///
    /// The appended segment combines a coarsened tick counter with random
    /// bytes, so concurrent spins of the same inbound value sort by time
    /// across hops without coordination.
    ///
    /// # Errors
    ///
    /// Fails only when the context validates with the strict policy and
    /// `value` is malformed.
    pub fn spin_in(
        value: &str,
        parameters: &SpinParameters,
        ctx: &CvContext,
    ) -> Result<Self, CorrelationVectorError> {
        if is_terminated(value) {
            return Ok(Self::parse(value));
        }

        let version = Version::infer(value);
        if ctx.validate() {
            if let Err(error) = validate(value, version) {
                ctx.route(error)?;
            }
        }

        let segment = spin_segment(parameters, ctx.entropy_source(), ctx.tick_source());
        let base = format!("{value}{DELIMITER}{segment}");
        if is_oversized(&base, 0, version) {
            tracing::debug!(vector = value, "spin would overflow; freezing input");
            return Ok(Self::parse(&format!("{value}{TERMINATOR}")));
        }

        Ok(Self::from_parts(base, 0, version, false))
    }

    /// Increments the extension by one and returns the new serialized
    /// value, ready for an outbound message header.
    ///
    /// Lock-free: concurrent callers retry on contention and never observe
    /// duplicate values. Two edge cases return the current value unchanged:
    /// an immutable vector, and an extension saturated at `i32::MAX`. An
    /// increment that would exceed the version's maximum length latches the
    /// vector immutable and returns the frozen value.
    pub fn increment(&self) -> String {
        if self.is_immutable() {
            return self.value();
        }
        loop {
            let snapshot = self.extension.load(Ordering::Acquire);
            if snapshot == MAX_EXTENSION {
                return self.value();
            }
            let next = snapshot + 1;
            if is_oversized(&self.base, next, self.version) {
                self.immutable.store(true, Ordering::Release);
                tracing::debug!(vector = %self.base, "increment would overflow; vector frozen");
                return self.value();
            }
            if self
                .extension
                .compare_exchange_weak(snapshot, next, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                return format!("{}{DELIMITER}{next}", self.base);
            }
        }
    }

    /// The serialized value: `<base>.<extension>`, plus the terminator when
    /// immutable.
    #[must_use]
    pub fn value(&self) -> String {
        let extension = self.extension.load(Ordering::Acquire);
        let mut rendered = format!("{}{DELIMITER}{extension}", self.base);
        if self.is_immutable() {
            rendered.push(TERMINATOR);
        }
        rendered
    }

    /// The immutable base segment(s) of the vector.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// The wire-format version.
    #[must_use]
    pub fn version(&self) -> Version {
        self.version
    }

    /// The current extension value.
    #[must_use]
    pub fn extension(&self) -> u32 {
        self.extension.load(Ordering::Acquire)
    }

    /// True once the vector has been frozen at its maximum length.
    #[must_use]
    pub fn is_immutable(&self) -> bool {
        self.immutable.load(Ordering::Acquire)
    }
}

impl Default for CorrelationVector {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for CorrelationVector {
    /// Snapshots the current state; the clone evolves independently.
    fn clone(&self) -> Self {
        Self {
            base: self.base.clone(),
            version: self.version,
            extension: AtomicU32::new(self.extension()),
            immutable: AtomicBool::new(self.is_immutable()),
        }
    }
}

impl fmt::Display for CorrelationVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value())
    }
}

impl PartialEq for CorrelationVector {
    /// Vectors are equal when their serialized values are equal.
    fn eq(&self, other: &Self) -> bool {
        self.value() == other.value()
    }
}

impl Eq for CorrelationVector {}

#[cfg(feature = "serde")]
impl serde::Serialize for CorrelationVector {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for CorrelationVector {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::parse(&value))
    }
}

fn is_terminated(value: &str) -> bool {
    value.ends_with(TERMINATOR)
}

/// Whether `<base>.<extension>` would exceed the version's maximum length.
fn is_oversized(base: &str, extension: u32, version: Version) -> bool {
    if base.is_empty() {
        return false;
    }
    let size = base.len() + 1 + decimal_digits(extension);
    size > version.max_length()
}

fn decimal_digits(value: u32) -> usize {
    if value == 0 {
        1
    } else {
        (value.ilog10() + 1) as usize
    }
}

fn generate_base(version: Version, entropy: &dyn EntropySource) -> String {
    match version {
        Version::V1 => {
            let mut seed = [0u8; 12];
            entropy.fill_bytes(&mut seed);
            render_base(&seed, version)
        }
        Version::V2 => {
            let mut seed = [0u8; 16];
            entropy.fill_bytes(&mut seed);
            render_base(&seed, version)
        }
    }
}

/// Encodes a seed buffer and truncates to the version's fixed base width.
fn render_base(seed: &[u8], version: Version) -> String {
    let mut encoded = encoding::to_unpadded_base64(seed);
    encoded.truncate(version.base_length());
    encoded
}

fn spin_segment(
    parameters: &SpinParameters,
    entropy: &dyn EntropySource,
    ticks: &dyn TickSource,
) -> String {
    let mut entropy_bytes = [0u8; 4];
    let count = parameters.entropy().bytes();
    entropy.fill_bytes(&mut entropy_bytes[..count]);

    let mut value =
        ticks.ticks_since_epoch() >> parameters.interval().ticks_bits_to_drop();
    for byte in &entropy_bytes[..count] {
        value = (value << 8) | u64::from(*byte);
    }

    // (1 << 64) wraps; at the full budget the value is used unmasked.
    let total_bits = parameters.total_bits();
    if total_bits < 64 {
        value &= (1u64 << total_bits) - 1;
    }

    let low = value as u32;
    if total_bits > 32 {
        let high = (value >> 32) as u32;
        format!("{high}{DELIMITER}{low}")
    } else {
        low.to_string()
    }
}

/// Checks a serialized vector against the version's format constraints.
fn validate(value: &str, version: Version) -> Result<(), CorrelationVectorError> {
    if value.trim().is_empty() {
        return Err(CorrelationVectorError::Empty);
    }

    let content = value.strip_suffix(TERMINATOR).unwrap_or(value);
    if content.len() > version.max_length() {
        return Err(CorrelationVectorError::Oversized {
            value: value.to_string(),
            version,
            max: version.max_length(),
        });
    }

    let segments: Vec<&str> = content.split(DELIMITER).collect();
    if segments.len() < 2 {
        return Err(CorrelationVectorError::TooFewSegments {
            value: value.to_string(),
        });
    }

    let base = segments[0];
    if base.len() != version.base_length() {
        return Err(CorrelationVectorError::InvalidBase {
            value: value.to_string(),
            base: base.to_string(),
            expected: version.base_length(),
        });
    }

    for segment in &segments[1..] {
        if !matches!(segment.parse::<u32>(), Ok(extension) if extension <= MAX_EXTENSION) {
            return Err(CorrelationVectorError::InvalidExtension {
                value: value.to_string(),
                segment: (*segment).to_string(),
            });
        }
    }

    Ok(())
}
