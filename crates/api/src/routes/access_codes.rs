//! Access-code backfill route.
//!
//! Legacy attendee rows predate code generation at registration time.
//! Backfilling regenerates the missing codes so the gate lookup universe
//! converges toward full coverage without attendees re-registering.

use axum::{
    extract::{Path, State},
    Json,
};
use domain::models::badge::BackfillResponse;
use domain::models::generate_access_code;
use persistence::repositories::{AttendeeRepository, ExhibitionRepository};
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;

/// Generate access codes for legacy rows lacking one.
///
/// POST /api/v1/exhibitions/:exhibition_id/access-codes/backfill
///
/// Existing codes are never overwritten; the write-once predicate in the
/// repository guards concurrent backfills.
pub async fn backfill_access_codes(
    State(state): State<AppState>,
    Path(exhibition_id): Path<i64>,
) -> Result<Json<BackfillResponse>, ApiError> {
    let exhibitions = ExhibitionRepository::new(state.pool.clone());
    let exhibition = exhibitions
        .find_by_id(exhibition_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Exhibition not found".to_string()))?;

    let repo = AttendeeRepository::new(state.pool.clone());
    let missing = repo.list_missing_codes(exhibition_id).await?;

    let mut generated = 0u64;
    for attendee in &missing {
        let code = generate_access_code(&exhibition.name, exhibition.id, attendee.exhibitor_id);
        generated += repo.set_access_code(attendee.id, &code).await?;
    }

    info!(
        exhibition_id,
        candidates = missing.len(),
        generated = generated,
        "Access-code backfill completed"
    );

    Ok(Json(BackfillResponse {
        exhibition_id,
        generated,
    }))
}
