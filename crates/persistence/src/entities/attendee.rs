//! Attendee entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

/// Database row mapping for the attendees table.
#[derive(Debug, Clone, FromRow)]
pub struct AttendeeEntity {
    pub id: i64,
    pub exhibition_id: i64,
    /// Null for pure invitees not attached to an exhibitor.
    pub exhibitor_id: Option<i64>,
    pub full_name: String,
    pub role_title: Option<String>,
    pub email: Option<String>,
    /// Null until generated; written at most once, then immutable.
    pub access_code: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Attendee row denormalized with exhibitor and exhibition context,
/// as needed by gate verification and badge rendering.
#[derive(Debug, Clone, FromRow)]
pub struct AttendeeWithContextEntity {
    pub id: i64,
    pub exhibition_id: i64,
    pub exhibitor_id: Option<i64>,
    pub full_name: String,
    pub role_title: Option<String>,
    pub email: Option<String>,
    pub access_code: Option<String>,
    pub created_at: DateTime<Utc>,
    // Exhibitor info
    pub company_name: Option<String>,
    // Exhibition info
    pub exhibition_name: String,
    pub exhibition_starts_on: NaiveDate,
    pub exhibition_ends_on: NaiveDate,
    pub exhibition_location: Option<String>,
    pub exhibition_status: String,
}

impl AttendeeWithContextEntity {
    /// Projects the plain attendee row out of the denormalized one.
    pub fn to_attendee(&self) -> AttendeeEntity {
        AttendeeEntity {
            id: self.id,
            exhibition_id: self.exhibition_id,
            exhibitor_id: self.exhibitor_id,
            full_name: self.full_name.clone(),
            role_title: self.role_title.clone(),
            email: self.email.clone(),
            access_code: self.access_code.clone(),
            created_at: self.created_at,
        }
    }
}
