//! Access-code construction for attendee credentials.
//!
//! An access code is a single opaque string assembled from the exhibition
//! name, padded exhibition and exhibitor identifiers, and an entry
//! identifier interleaving clock digits with random digits. The verifier
//! compares the whole string by exact match and never parses it back apart;
//! the human-readable leading segments exist for support and debugging only.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;

/// Digit width of the exhibition identifier segment.
const EXHIBITION_ID_WIDTH: usize = 4;

/// Digit width of the exhibitor identifier segment.
const EXHIBITOR_ID_WIDTH: usize = 4;

/// Literal marker preceding the exhibitor identifier segment.
const EXHIBITOR_MARKER: &str = "w";

/// Literal marker preceding the trailing random segment.
const RANDOM_MARKER: &str = "rnd";

/// Generates the access code for one attendee record.
///
/// The code is built from five ordered segments with no delimiter:
/// the whitespace-normalized exhibition name, the padded exhibition id,
/// `w` plus the padded exhibitor id (0 when the attendee is a pure
/// invitee), an entry identifier, `rnd` plus six random digits, and the
/// entry identifier repeated. Already-issued codes depend on this exact
/// shape, including the repeated entry identifier.
///
/// Callers must check for a pre-existing code on the record first; this
/// function does not consult storage and returns a fresh value every call.
pub fn generate_access_code(
    exhibition_name: &str,
    exhibition_id: i64,
    exhibitor_id: Option<i64>,
) -> String {
    let mut rng = rand::thread_rng();
    let entry = entry_identifier(low_order_time_digits(), rng.gen_range(0..1_000_000));
    let suffix: u32 = rng.gen_range(0..1_000_000);

    format!(
        "{}{}{}{}{}{}{:06}{}",
        normalize_name(exhibition_name),
        pad_id(exhibition_id, EXHIBITION_ID_WIDTH),
        EXHIBITOR_MARKER,
        pad_id(exhibitor_id.unwrap_or(0), EXHIBITOR_ID_WIDTH),
        entry,
        RANDOM_MARKER,
        suffix,
        entry,
    )
}

/// Trims the name and collapses interior whitespace runs to single spaces.
fn normalize_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Zero-pads an identifier to `width` digits, keeping only the last
/// `width` digits of wider values.
fn pad_id(id: i64, width: usize) -> String {
    let digits = id.unsigned_abs().to_string();
    if digits.len() > width {
        digits[digits.len() - width..].to_string()
    } else {
        format!("{:0>width$}", digits)
    }
}

/// Six low-order digits of the current time, at sub-millisecond resolution.
fn low_order_time_digits() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| (d.as_nanos() % 1_000_000) as u32)
        .unwrap_or(0)
}

/// Builds the nine-digit entry identifier: the first three time digits,
/// three random digits, then the remaining three time digits.
fn entry_identifier(time_fragment: u32, random_fragment: u32) -> String {
    let time_digits = format!("{:06}", time_fragment % 1_000_000);
    let rand_digits = format!("{:06}", random_fragment % 1_000_000);
    format!(
        "{}{}{}",
        &time_digits[..3],
        &rand_digits[..3],
        &time_digits[3..]
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::company::en::CompanyName;
    use fake::Fake;
    use std::collections::HashSet;

    #[test]
    fn test_segment_order_and_offsets() {
        let code = generate_access_code("Food Tech Expo", 17, Some(42));

        // name (14) | exhibition id (4) | "w" + exhibitor id (5) | entry (9)
        // | "rnd" + 6 digits | entry (9)
        assert!(code.starts_with("Food Tech Expo"));
        assert_eq!(&code[14..18], "0017");
        assert_eq!(&code[18..23], "w0042");
        assert_eq!(&code[32..35], "rnd");
        assert_eq!(code.len(), 14 + 4 + 5 + 9 + 9 + 9);
    }

    #[test]
    fn test_entry_identifier_embedded_twice() {
        let code = generate_access_code("Expo", 1, Some(2));
        let entry_first = &code[4 + 4 + 5..4 + 4 + 5 + 9];
        let entry_second = &code[code.len() - 9..];
        assert_eq!(entry_first, entry_second);
    }

    #[test]
    fn test_exhibition_id_truncates_to_last_four_digits() {
        let code = generate_access_code("X", 12345, Some(1));
        assert_eq!(&code[1..5], "2345");
    }

    #[test]
    fn test_absent_exhibitor_renders_zero_placeholder() {
        let code = generate_access_code("X", 7, None);
        assert_eq!(&code[1..10], "0007w0000");
    }

    #[test]
    fn test_exhibitor_id_zero_matches_absent() {
        let explicit = generate_access_code("X", 7, Some(0));
        assert_eq!(&explicit[5..10], "w0000");
    }

    #[test]
    fn test_exhibitor_id_truncates_to_last_four_digits() {
        let code = generate_access_code("X", 7, Some(987654));
        assert_eq!(&code[5..10], "w7654");
    }

    #[test]
    fn test_name_whitespace_is_normalized() {
        let code = generate_access_code("  Food   Tech \tExpo ", 17, Some(42));
        assert!(code.starts_with("Food Tech Expo0017w0042"));
    }

    #[test]
    fn test_empty_name_degrades_to_empty_segment() {
        let code = generate_access_code("", 17, Some(42));
        assert!(code.starts_with("0017w0042"));
    }

    #[test]
    fn test_digit_segments_are_ascii_digits() {
        let code = generate_access_code("Expo", 17, Some(42));
        let tail = &code[4..];
        assert!(tail
            .chars()
            .all(|c| c.is_ascii_digit() || c == 'w' || c == 'r' || c == 'n' || c == 'd'));
    }

    #[test]
    fn test_offsets_hold_for_arbitrary_names() {
        for _ in 0..20 {
            let name: String = CompanyName().fake();
            let normalized = name.split_whitespace().collect::<Vec<_>>().join(" ");
            let code = generate_access_code(&name, 17, Some(42));
            let base = normalized.len();
            assert_eq!(&code[base..base + 4], "0017");
            assert_eq!(&code[base + 4..base + 9], "w0042");
        }
    }

    #[test]
    fn test_no_collisions_across_100k_generations() {
        let mut seen = HashSet::with_capacity(100_000);
        for _ in 0..100_000 {
            let code = generate_access_code("Food Tech Expo", 17, Some(42));
            assert!(seen.insert(code), "duplicate access code generated");
        }
    }

    #[test]
    fn test_entry_identifier_interleaving() {
        let entry = entry_identifier(123_456, 789_012);
        assert_eq!(entry, "123789456");
    }

    #[test]
    fn test_entry_identifier_pads_short_fragments() {
        let entry = entry_identifier(42, 7);
        assert_eq!(entry, "000000042");
    }

    #[test]
    fn test_pad_id_exact_width() {
        assert_eq!(pad_id(1234, 4), "1234");
        assert_eq!(pad_id(1, 4), "0001");
        assert_eq!(pad_id(0, 4), "0000");
    }
}
