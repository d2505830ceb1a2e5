//! Unpadded base64 rendering of vector bases.
//!
//! Bases use the standard alphabet (`A-Z a-z 0-9 + /`) with no `=` padding:
//! a 12-byte V1 seed renders to exactly 16 characters and a 16-byte V2 seed
//! to exactly 22. The final character of a 22-character base carries only
//! the high bits of its 6-bit group; the low-order bits of the source are
//! discarded by the fixed-width truncation.

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;

/// Encodes a byte buffer as unpadded standard-alphabet base64.
///
/// The output length is `ceil(len * 8 / 6)` characters.
#[must_use]
pub fn to_unpadded_base64(bytes: &[u8]) -> String {
    STANDARD_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twelve_bytes_render_to_sixteen_chars() {
        let encoded = to_unpadded_base64(&[0xAB; 12]);
        assert_eq!(encoded.len(), 16);
        assert!(!encoded.contains('='));
    }

    #[test]
    fn sixteen_bytes_render_to_twenty_two_chars() {
        let encoded = to_unpadded_base64(&[0xCD; 16]);
        assert_eq!(encoded.len(), 22);
        assert!(!encoded.contains('='));
    }

    #[test]
    fn empty_input_renders_empty() {
        assert_eq!(to_unpadded_base64(&[]), "");
    }

    #[test]
    fn uses_standard_alphabet() {
        // 0xFB 0xEF 0xBE encodes to "++++" shifted variants; spot-check the
        // `+` and `/` symbols appear where the standard alphabet places them.
        assert_eq!(to_unpadded_base64(&[0xFB, 0xEF, 0xBE]), "++++");
        assert_eq!(to_unpadded_base64(&[0xFF, 0xFF, 0xFF]), "////");
    }

    #[test]
    fn remainder_groups_have_no_padding() {
        assert_eq!(to_unpadded_base64(&[0x00]).len(), 2);
        assert_eq!(to_unpadded_base64(&[0x00, 0x00]).len(), 3);
    }
}
