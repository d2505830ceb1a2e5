//! Wire-format versions of the correlation vector.
//!
//! The version is fixed at construction and determines the base segment
//! length and the maximum serialized length of the whole vector.

use crate::vector::DELIMITER;
use core::fmt;

/// Correlation vector wire-format version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Version {
    /// 16-character base, 63-character maximum serialized length.
    V1,
    /// 22-character base, 127-character maximum serialized length.
    V2,
}

impl Version {
    /// Length of the base segment for this version.
    #[must_use]
    pub const fn base_length(self) -> usize {
        match self {
            Self::V1 => 16,
            Self::V2 => 22,
        }
    }

    /// Maximum serialized length (excluding the terminator) for this version.
    #[must_use]
    pub const fn max_length(self) -> usize {
        match self {
            Self::V1 => 63,
            Self::V2 => 127,
        }
    }

    /// Infers the version from a serialized vector.
    ///
    /// The first delimiter at offset 16 marks V1, at offset 22 V2. Any other
    /// shape (including an empty string) falls back to V1 so that malformed
    /// inbound values remain usable.
    #[must_use]
    pub fn infer(value: &str) -> Self {
        match value.find(DELIMITER) {
            Some(16) => Self::V1,
            Some(22) => Self::V2,
            _ => Self::V1,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V1 => f.write_str("V1"),
            Self::V2 => f.write_str("V2"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_v1_from_base_offset() {
        assert_eq!(Version::infer("tul4NUsfs9Cl7mOf.1"), Version::V1);
    }

    #[test]
    fn infers_v2_from_base_offset() {
        assert_eq!(Version::infer("KZY+dsX2jEaZesgCPjJ2Ng.1"), Version::V2);
    }

    #[test]
    fn falls_back_to_v1() {
        assert_eq!(Version::infer(""), Version::V1);
        assert_eq!(Version::infer("no-delimiter"), Version::V1);
        assert_eq!(Version::infer("short.1"), Version::V1);
    }

    #[test]
    fn limits_match_versions() {
        assert_eq!(Version::V1.base_length(), 16);
        assert_eq!(Version::V1.max_length(), 63);
        assert_eq!(Version::V2.base_length(), 22);
        assert_eq!(Version::V2.max_length(), 127);
    }
}
