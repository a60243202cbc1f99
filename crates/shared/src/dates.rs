//! Date formatting for attendee-facing output (badges, verification payloads).

use chrono::NaiveDate;

/// Display format for a single exhibition day.
const DAY_FORMAT: &str = "%d.%m.%Y";

/// Formats an exhibition date range for display.
///
/// A one-day exhibition renders as a single date; multi-day ranges render
/// as `start - end`.
pub fn format_date_range(starts_on: NaiveDate, ends_on: NaiveDate) -> String {
    if starts_on == ends_on {
        starts_on.format(DAY_FORMAT).to_string()
    } else {
        format!(
            "{} - {}",
            starts_on.format(DAY_FORMAT),
            ends_on.format(DAY_FORMAT)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_format_single_day() {
        assert_eq!(
            format_date_range(date(2025, 3, 14), date(2025, 3, 14)),
            "14.03.2025"
        );
    }

    #[test]
    fn test_format_range() {
        assert_eq!(
            format_date_range(date(2025, 3, 14), date(2025, 3, 16)),
            "14.03.2025 - 16.03.2025"
        );
    }

    #[test]
    fn test_format_range_across_year() {
        assert_eq!(
            format_date_range(date(2025, 12, 30), date(2026, 1, 2)),
            "30.12.2025 - 02.01.2026"
        );
    }
}
