//! Parameters for the Spin operator.
//!
//! Spin appends a time-plus-entropy derived segment to an inbound vector.
//! The knobs here select how coarse the time counter is, how many bits it
//! keeps before wrapping, and how many random bytes disambiguate exact
//! ties. Each knob is a closed variant carrying its fixed numeric payload,
//! so invalid combinations are unrepresentable.

/// The interval (proportional to time) by which the spin counter increments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpinCounterInterval {
    /// Drops the 24 least significant bits of the tick count; the counter
    /// increments roughly every 1.67 seconds.
    Coarse,
    /// Drops the 16 least significant bits of the tick count; the counter
    /// increments roughly every 6.5 milliseconds.
    Fine,
}

impl SpinCounterInterval {
    /// Number of least significant tick bits dropped when computing the
    /// counter.
    #[must_use]
    pub const fn ticks_bits_to_drop(self) -> u32 {
        match self {
            Self::Coarse => 24,
            Self::Fine => 16,
        }
    }
}

/// How frequently the spin counter wraps to zero, as determined by the
/// number of bits that store it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpinCounterPeriodicity {
    /// Store no counter in the spin value.
    None,
    /// Store the counter using 16 bits.
    Short,
    /// Store the counter using 24 bits.
    Medium,
    /// Store the counter using 32 bits.
    Long,
}

impl SpinCounterPeriodicity {
    /// Number of bits allocated to the counter.
    #[must_use]
    pub const fn counter_bits(self) -> u32 {
        match self {
            Self::None => 0,
            Self::Short => 16,
            Self::Medium => 24,
            Self::Long => 32,
        }
    }
}

/// Number of random bytes mixed into the spin value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpinEntropy {
    /// No entropy.
    None,
    /// One byte (8 bits) of entropy.
    One,
    /// Two bytes (16 bits) of entropy.
    Two,
    /// Three bytes (24 bits) of entropy.
    Three,
    /// Four bytes (32 bits) of entropy.
    Four,
}

impl SpinEntropy {
    /// Number of entropy bytes.
    #[must_use]
    pub const fn bytes(self) -> usize {
        match self {
            Self::None => 0,
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
            Self::Four => 4,
        }
    }
}

/// Immutable configuration bundle for the Spin operator.
///
/// The default is a coarse interval, short periodicity, and two entropy
/// bytes: a 32-bit spin value whose high 16 bits sort by time and whose
/// low 16 bits are random.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpinParameters {
    interval: SpinCounterInterval,
    periodicity: SpinCounterPeriodicity,
    entropy: SpinEntropy,
}

impl SpinParameters {
    /// Creates a parameter bundle from its three knobs.
    #[must_use]
    pub const fn new(
        interval: SpinCounterInterval,
        periodicity: SpinCounterPeriodicity,
        entropy: SpinEntropy,
    ) -> Self {
        Self {
            interval,
            periodicity,
            entropy,
        }
    }

    /// Returns a copy with the given counter interval.
    #[must_use]
    pub const fn with_interval(mut self, interval: SpinCounterInterval) -> Self {
        self.interval = interval;
        self
    }

    /// Returns a copy with the given counter periodicity.
    #[must_use]
    pub const fn with_periodicity(mut self, periodicity: SpinCounterPeriodicity) -> Self {
        self.periodicity = periodicity;
        self
    }

    /// Returns a copy with the given entropy width.
    #[must_use]
    pub const fn with_entropy(mut self, entropy: SpinEntropy) -> Self {
        self.entropy = entropy;
        self
    }

    /// The counter interval.
    #[must_use]
    pub const fn interval(self) -> SpinCounterInterval {
        self.interval
    }

    /// The counter periodicity.
    #[must_use]
    pub const fn periodicity(self) -> SpinCounterPeriodicity {
        self.periodicity
    }

    /// The entropy width.
    #[must_use]
    pub const fn entropy(self) -> SpinEntropy {
        self.entropy
    }

    /// Total bit budget of the spin value: counter bits plus entropy bits.
    #[must_use]
    pub const fn total_bits(self) -> u32 {
        self.periodicity.counter_bits() + self.entropy.bytes() as u32 * 8
    }
}

impl Default for SpinParameters {
    fn default() -> Self {
        Self::new(
            SpinCounterInterval::Coarse,
            SpinCounterPeriodicity::Short,
            SpinEntropy::Two,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_coarse_short_two() {
        let params = SpinParameters::default();
        assert_eq!(params.interval(), SpinCounterInterval::Coarse);
        assert_eq!(params.periodicity(), SpinCounterPeriodicity::Short);
        assert_eq!(params.entropy(), SpinEntropy::Two);
        assert_eq!(params.total_bits(), 32);
    }

    #[test]
    fn total_bits_spans_zero_to_sixty_four() {
        let none = SpinParameters::new(
            SpinCounterInterval::Coarse,
            SpinCounterPeriodicity::None,
            SpinEntropy::None,
        );
        assert_eq!(none.total_bits(), 0);

        let max = SpinParameters::new(
            SpinCounterInterval::Fine,
            SpinCounterPeriodicity::Long,
            SpinEntropy::Four,
        );
        assert_eq!(max.total_bits(), 64);
    }

    #[test]
    fn builder_methods_replace_single_knobs() {
        let params = SpinParameters::default()
            .with_interval(SpinCounterInterval::Fine)
            .with_periodicity(SpinCounterPeriodicity::Long)
            .with_entropy(SpinEntropy::None);
        assert_eq!(params.interval().ticks_bits_to_drop(), 16);
        assert_eq!(params.total_bits(), 32);
    }
}
