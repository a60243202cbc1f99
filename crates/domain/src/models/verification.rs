//! Gate verification request/response models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request carrying a scanned access code.
///
/// The code is matched as one opaque string; it is never parsed back into
/// its segments.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct VerifyRequest {
    /// The scanned value, verbatim.
    #[validate(length(max = 512, message = "Scanned code is too long"))]
    pub code: String,
}

/// Attendee identity returned on a verification hit.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct VerifiedAttendee {
    pub id: i64,
    pub full_name: String,
    pub role_title: Option<String>,
    pub email: Option<String>,
}

/// Exhibitor company identity returned on a verification hit.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct VerifiedExhibitor {
    pub id: i64,
    pub company_name: String,
}

/// Exhibition context returned on a verification hit.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct VerifiedExhibition {
    pub id: i64,
    pub name: String,
    pub location: Option<String>,
    pub status: String,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    /// Pre-formatted date range for gate-staff display.
    pub date_range: String,
}

/// Successful verification payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct VerificationResponse {
    pub attendee: VerifiedAttendee,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exhibitor: Option<VerifiedExhibitor>,
    pub exhibition: VerifiedExhibition,
    pub verified_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_request_accepts_normal_code() {
        let request = VerifyRequest {
            code: "Food Tech Expo0017w0042123456789rnd654321123456789".to_string(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_verify_request_rejects_oversized_code() {
        let request = VerifyRequest {
            code: "x".repeat(513),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_verification_response_serialization() {
        let response = VerificationResponse {
            attendee: VerifiedAttendee {
                id: 5,
                full_name: "Jana Nováková".to_string(),
                role_title: Some("Sales".to_string()),
                email: None,
            },
            exhibitor: Some(VerifiedExhibitor {
                id: 42,
                company_name: "ACME".to_string(),
            }),
            exhibition: VerifiedExhibition {
                id: 17,
                name: "Food Tech Expo".to_string(),
                location: Some("Hall B".to_string()),
                status: "published".to_string(),
                starts_on: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
                ends_on: NaiveDate::from_ymd_opt(2025, 3, 16).unwrap(),
                date_range: "14.03.2025 - 16.03.2025".to_string(),
            },
            verified_at: Utc::now(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"full_name\":\"Jana Nováková\""));
        assert!(json.contains("\"company_name\":\"ACME\""));
        assert!(json.contains("\"date_range\":\"14.03.2025 - 16.03.2025\""));
        assert!(json.contains("\"email\":null"));
    }

    #[test]
    fn test_verification_response_omits_missing_exhibitor() {
        let response = VerificationResponse {
            attendee: VerifiedAttendee {
                id: 5,
                full_name: "Guest".to_string(),
                role_title: None,
                email: None,
            },
            exhibitor: None,
            exhibition: VerifiedExhibition {
                id: 17,
                name: "Expo".to_string(),
                location: None,
                status: "published".to_string(),
                starts_on: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
                ends_on: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
                date_range: "14.03.2025".to_string(),
            },
            verified_at: Utc::now(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("\"exhibitor\""));
    }
}
