// THEORY:
// The `position` module turns a pixel's place in the scan into the string label
// that tells its sample apart from every other sample of the same run. Downstream
// consumers group and sort samples by this label, so the encoding is part of the
// data contract and must be deterministic.
//
// Two encodings exist:
// 1.  **Decimal (fixed width)**: the zero-based index, left-padded with zeros to
//     the width of the largest index of the run. All labels have the same length,
//     so string order equals scan order. This is what a run uses.
// 2.  **Alphabetic (bijective base 26)**: spreadsheet-column style letters for the
//     one-based position ("a", "b", .. "z", "aa", ..). Labels are unique but their
//     length grows, so "aa" sorts before "b" even though it comes later in the
//     scan. Kept for consumers that already expect letter labels.
//
// Both are pure functions of their inputs and carry no state beyond the padding
// width computed once per run.

pub mod position {
    /// Upper bounds for each decimal digit count, 1 digit through 20.
    const DIGIT_THRESHOLDS: [u64; 20] = [
        9,
        99,
        999,
        9_999,
        99_999,
        999_999,
        9_999_999,
        99_999_999,
        999_999_999,
        9_999_999_999,
        99_999_999_999,
        999_999_999_999,
        9_999_999_999_999,
        99_999_999_999_999,
        999_999_999_999_999,
        9_999_999_999_999_999,
        99_999_999_999_999_999,
        999_999_999_999_999_999,
        9_999_999_999_999_999_999,
        u64::MAX,
    ];

    const ALPHABET_LEN: u64 = 26;

    /// Maps the zero-based scan index of a pixel to its position label.
    pub trait PositionEncoder {
        fn encode(&self, index: u64) -> String;
    }

    /// Number of decimal digits needed to print `value`.
    pub fn digit_count(value: u64) -> usize {
        DIGIT_THRESHOLDS
            .iter()
            .position(|&threshold| value <= threshold)
            .map_or(DIGIT_THRESHOLDS.len(), |i| i + 1)
    }

    /// Zero-padded decimal labels, all as wide as the largest index of the run.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DecimalEncoder {
        max_digits: usize,
    }

    impl DecimalEncoder {
        /// Sizes the labels for a run of `total` pixels (indices `0..total`).
        pub fn for_total(total: u64) -> Self {
            Self {
                max_digits: digit_count(total.saturating_sub(1)),
            }
        }

        /// The length of every label this encoder produces.
        pub fn width(&self) -> usize {
            self.max_digits
        }
    }

    impl PositionEncoder for DecimalEncoder {
        fn encode(&self, index: u64) -> String {
            let digits = index.to_string();
            let padding = self.max_digits.saturating_sub(digits.len());
            let mut label = String::with_capacity(padding + digits.len());
            label.extend(std::iter::repeat_n('0', padding));
            label.push_str(&digits);
            label
        }
    }

    /// Letter labels ("a", "b", .. "z", "aa", ..) for the one-based scan position.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct AlphaEncoder;

    impl PositionEncoder for AlphaEncoder {
        fn encode(&self, index: u64) -> String {
            encode_alpha(index.saturating_add(1))
        }
    }

    /// Bijective base-26 encoding of a one-based position.
    ///
    /// Position 0 has no letters and encodes to an empty string.
    pub fn encode_alpha(position: u64) -> String {
        let mut letters = Vec::new();
        let mut n = position;
        while n > 0 {
            let remainder = (n - 1) % ALPHABET_LEN;
            letters.push(char::from(b'a' + remainder as u8));
            n = (n - 1) / ALPHABET_LEN;
        }
        letters.iter().rev().collect()
    }

    /// Inverse of [`encode_alpha`]. Returns `None` for empty labels, characters
    /// outside `a..=z`, or positions that overflow `u64`.
    pub fn decode_alpha(label: &str) -> Option<u64> {
        if label.is_empty() {
            return None;
        }
        label.bytes().try_fold(0u64, |n, byte| {
            if !byte.is_ascii_lowercase() {
                return None;
            }
            n.checked_mul(ALPHABET_LEN)?
                .checked_add(u64::from(byte - b'a') + 1)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::position::*;

    #[test]
    fn digit_count_follows_thresholds() {
        assert_eq!(digit_count(0), 1);
        assert_eq!(digit_count(9), 1);
        assert_eq!(digit_count(10), 2);
        assert_eq!(digit_count(99), 2);
        assert_eq!(digit_count(100), 3);
        assert_eq!(digit_count(999_999_999), 9);
        assert_eq!(digit_count(1_000_000_000), 10);
        assert_eq!(digit_count(u64::MAX), 20);
    }

    #[test]
    fn decimal_labels_are_fixed_width_and_parse_back() {
        for total in [1u64, 2, 9, 10, 11, 99, 100, 101, 1000, 4321] {
            let encoder = DecimalEncoder::for_total(total);
            let expected_width = digit_count(total - 1);
            assert_eq!(encoder.width(), expected_width, "total {total}");

            for idx in 0..total {
                let label = encoder.encode(idx);
                assert_eq!(label.len(), expected_width, "total {total}, idx {idx}");
                assert_eq!(label.parse::<u64>().expect("decimal label"), idx);
            }
        }
    }

    #[test]
    fn decimal_width_tracks_the_largest_index_not_the_count() {
        // 10 pixels have indices 0..=9, which fit in one digit.
        let encoder = DecimalEncoder::for_total(10);
        assert_eq!(encoder.encode(0), "0");
        assert_eq!(encoder.encode(9), "9");

        let encoder = DecimalEncoder::for_total(11);
        assert_eq!(encoder.encode(0), "00");
        assert_eq!(encoder.encode(10), "10");
    }

    #[test]
    fn decimal_labels_sort_in_scan_order() {
        let total = 2_500u64;
        let encoder = DecimalEncoder::for_total(total);
        let labels: Vec<String> = (0..total).map(|idx| encoder.encode(idx)).collect();
        for pair in labels.windows(2) {
            assert!(pair[0] < pair[1], "{} should sort before {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn alpha_round_trips_known_positions() {
        let cases = [("a", 1u64), ("z", 26), ("aa", 27), ("az", 52), ("ba", 53), ("zz", 702), ("aaa", 703)];
        for (label, position) in cases {
            assert_eq!(encode_alpha(position), label);
            assert_eq!(decode_alpha(label), Some(position));
        }
    }

    #[test]
    fn alpha_encoder_treats_scan_index_as_one_based() {
        let encoder = AlphaEncoder;
        assert_eq!(encoder.encode(0), "a");
        assert_eq!(encoder.encode(25), "z");
        assert_eq!(encoder.encode(26), "aa");
    }

    #[test]
    fn alpha_position_zero_is_empty() {
        assert_eq!(encode_alpha(0), "");
        assert_eq!(decode_alpha(""), None);
    }

    #[test]
    fn alpha_rejects_foreign_characters() {
        assert_eq!(decode_alpha("aB"), None);
        assert_eq!(decode_alpha("a1"), None);
    }

    #[test]
    fn alpha_labels_are_unique() {
        let labels: std::collections::HashSet<String> = (1..=20_000u64).map(encode_alpha).collect();
        assert_eq!(labels.len(), 20_000);
    }

    #[test]
    fn alpha_same_length_labels_sort_numerically() {
        // 27..=702 all have two letters.
        for n in 27..702u64 {
            assert!(encode_alpha(n) < encode_alpha(n + 1));
        }
    }

    #[test]
    fn alpha_order_breaks_across_lengths() {
        // Expected behavior: shorter labels are not padded, so "aa" (27) sorts
        // before "b" (2) as a string.
        let early = encode_alpha(2);
        let late = encode_alpha(27);
        assert_eq!(early, "b");
        assert_eq!(late, "aa");
        assert!(late < early);
    }
}
