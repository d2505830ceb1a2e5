//! Property tests for correlation vector round-trips and growth.
//!
//! Verifies parse/render stability over generated well-formed vectors,
//! extend's `.0` suffix contract, and sequential increment ordering.

use correlation_vector::{CorrelationVector, CvContext, Version};
use proptest::prelude::*;

const BASE64_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

fn arb_base(length: usize) -> impl Strategy<Value = String> {
    proptest::collection::vec(0..BASE64_ALPHABET.len(), length).prop_map(|indices| {
        indices
            .iter()
            .map(|&index| BASE64_ALPHABET[index] as char)
            .collect()
    })
}

fn arb_v1_base() -> impl Strategy<Value = String> {
    arb_base(16)
}

fn arb_v2_base() -> impl Strategy<Value = String> {
    arb_base(22)
}

/// A well-formed V1 vector that stays well under the 63-character limit.
fn arb_v1_vector() -> impl Strategy<Value = String> {
    (
        arb_v1_base(),
        proptest::collection::vec(0u32..=9999, 1..4),
    )
        .prop_map(|(base, extensions)| {
            let mut vector = base;
            for extension in extensions {
                vector.push('.');
                vector.push_str(&extension.to_string());
            }
            vector
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// extend(base).value() == base + ".0" for any valid V1 base.
    #[test]
    fn extend_appends_zero_to_v1_bases(base in arb_v1_base()) {
        let cv = CorrelationVector::extend(&base);
        prop_assert_eq!(cv.value(), format!("{base}.0"));
    }

    /// extend(base).value() == base + ".0" for any valid V2 base, and the
    /// version is inferred from the 22-character offset once extended.
    #[test]
    fn extend_appends_zero_to_v2_bases(base in arb_v2_base()) {
        let cv = CorrelationVector::extend(&base);
        prop_assert_eq!(cv.value(), format!("{base}.0"));

        let rescoped = CorrelationVector::extend(&cv.value());
        prop_assert_eq!(rescoped.version(), Version::V2);
    }

    /// parse(v).value() == v for well-formed vectors.
    #[test]
    fn parse_render_round_trip(vector in arb_v1_vector()) {
        let cv = CorrelationVector::parse(&vector);
        prop_assert_eq!(cv.value(), vector);
    }

    /// A trailing terminator survives the round trip and freezes the vector.
    #[test]
    fn terminated_round_trip(vector in arb_v1_vector()) {
        let frozen = format!("{vector}!");
        let cv = CorrelationVector::parse(&frozen);
        prop_assert!(cv.is_immutable());
        prop_assert_eq!(cv.value(), frozen.clone());
        prop_assert_eq!(cv.increment(), frozen);
    }

    /// parse(extend(v).value()) is stable for well-formed vectors.
    #[test]
    fn extend_round_trip(vector in arb_v1_vector()) {
        let extended = CorrelationVector::extend(&vector);
        let reparsed = CorrelationVector::parse(&extended.value());
        prop_assert_eq!(reparsed.value(), extended.value());
    }

    /// Well-formed generated vectors pass strict validation.
    #[test]
    fn generated_vectors_validate_strictly(vector in arb_v1_vector()) {
        let result = CorrelationVector::extend_in(&vector, &CvContext::strict());
        prop_assert!(result.is_ok());
    }

    /// Sequential increments return 1..=n in order.
    #[test]
    fn increments_are_sequential(base in arb_v1_base(), count in 1usize..32) {
        let cv = CorrelationVector::extend(&base);
        for expected in 1..=count {
            let rendered = cv.increment();
            prop_assert_eq!(rendered, format!("{}.{}", cv.base(), expected));
        }
        prop_assert_eq!(cv.extension(), count as u32);
    }
}
