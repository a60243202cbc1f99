//! Exhibition entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

/// Database row mapping for the exhibitions table.
#[derive(Debug, Clone, FromRow)]
pub struct ExhibitionEntity {
    pub id: i64,
    pub name: String,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub location: Option<String>,
    pub status: String,
    /// Opening hours shown to exhibitor staff, e.g. "08:00 - 19:00".
    pub exhibitor_hours: Option<String>,
    /// Opening hours shown to visitors.
    pub visitor_hours: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ExhibitionEntity {
    /// The attendee-facing time range: exhibitor hours when configured,
    /// visitor hours otherwise.
    pub fn display_hours(&self) -> Option<&str> {
        self.exhibitor_hours
            .as_deref()
            .or(self.visitor_hours.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exhibition(exhibitor_hours: Option<&str>, visitor_hours: Option<&str>) -> ExhibitionEntity {
        ExhibitionEntity {
            id: 17,
            name: "Expo".to_string(),
            starts_on: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            ends_on: NaiveDate::from_ymd_opt(2025, 3, 16).unwrap(),
            location: None,
            status: "published".to_string(),
            exhibitor_hours: exhibitor_hours.map(String::from),
            visitor_hours: visitor_hours.map(String::from),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_display_hours_prefers_exhibitor_hours() {
        let e = exhibition(Some("08:00 - 19:00"), Some("09:00 - 18:00"));
        assert_eq!(e.display_hours(), Some("08:00 - 19:00"));
    }

    #[test]
    fn test_display_hours_falls_back_to_visitor_hours() {
        let e = exhibition(None, Some("09:00 - 18:00"));
        assert_eq!(e.display_hours(), Some("09:00 - 18:00"));
    }

    #[test]
    fn test_display_hours_absent() {
        let e = exhibition(None, None);
        assert_eq!(e.display_hours(), None);
    }
}
