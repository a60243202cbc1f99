//! Gate verification route.

use axum::{extract::State, Json};
use chrono::Utc;
use domain::models::verification::{
    VerificationResponse, VerifiedAttendee, VerifiedExhibition, VerifiedExhibitor, VerifyRequest,
};
use persistence::repositories::AttendeeRepository;
use shared::dates::format_date_range;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_verification;

/// Message returned for every miss; a blank or unknown code is the same
/// not-found outcome, never a server error.
const NOT_FOUND_MESSAGE: &str = "No attendee matches the scanned code";

/// Verify a scanned access code.
///
/// POST /api/v1/verify
///
/// The scanned value is matched verbatim as one opaque string; it is
/// never parsed into its segments. Stored rows without a code are
/// excluded from the lookup universe.
pub async fn verify_code(
    State(state): State<AppState>,
    Json(request): Json<VerifyRequest>,
) -> Result<Json<VerificationResponse>, ApiError> {
    request.validate()?;

    // Blank scans never reach the database: a null stored code must not
    // match a null scanned one.
    if request.code.trim().is_empty() {
        record_verification(false);
        return Err(ApiError::NotFound(NOT_FOUND_MESSAGE.to_string()));
    }

    let repo = AttendeeRepository::new(state.pool.clone());
    let hit = repo.find_by_access_code(&request.code).await?;

    let Some(attendee) = hit else {
        record_verification(false);
        info!("Gate verification miss");
        return Err(ApiError::NotFound(NOT_FOUND_MESSAGE.to_string()));
    };

    record_verification(true);
    info!(
        attendee_id = attendee.id,
        exhibition_id = attendee.exhibition_id,
        "Gate verification hit"
    );

    let exhibitor = match (attendee.exhibitor_id, &attendee.company_name) {
        (Some(id), Some(company_name)) => Some(VerifiedExhibitor {
            id,
            company_name: company_name.clone(),
        }),
        _ => None,
    };

    Ok(Json(VerificationResponse {
        attendee: VerifiedAttendee {
            id: attendee.id,
            full_name: attendee.full_name,
            role_title: attendee.role_title,
            email: attendee.email,
        },
        exhibitor,
        exhibition: VerifiedExhibition {
            id: attendee.exhibition_id,
            name: attendee.exhibition_name,
            location: attendee.exhibition_location,
            status: attendee.exhibition_status,
            starts_on: attendee.exhibition_starts_on,
            ends_on: attendee.exhibition_ends_on,
            date_range: format_date_range(
                attendee.exhibition_starts_on,
                attendee.exhibition_ends_on,
            ),
        },
        verified_at: Utc::now(),
    }))
}
