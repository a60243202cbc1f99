//! Badge and QR retrieval routes.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use domain::models::badge::QrDescriptorResponse;
use persistence::repositories::{AttendeeRepository, ExhibitionRepository};
use serde::Deserialize;
use shared::sanitize::sanitize_filename_component;
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_badges_rendered;
use crate::services::{BadgeArchiveBuilder, QrEncoder};

/// Query parameters for the bulk archive endpoint.
#[derive(Debug, Deserialize)]
pub struct BulkQuery {
    pub exhibitor_id: Option<i64>,
}

/// Query parameters for the standalone QR endpoint.
#[derive(Debug, Deserialize)]
pub struct QrQuery {
    pub format: Option<String>,
}

/// Retrieve one printable badge.
///
/// GET /api/v1/attendees/:attendee_id/badge
///
/// The document is regenerated from current data on every request; edits
/// to branding or attendee data show up on the next download.
pub async fn get_badge(
    State(state): State<AppState>,
    Path(attendee_id): Path<i64>,
) -> Result<Response, ApiError> {
    let repo = AttendeeRepository::new(state.pool.clone());
    let attendee = repo
        .find_with_context(attendee_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Attendee not found".to_string()))?;

    let renderer = state.badge_renderer();
    let pdf = renderer
        .render(
            attendee.exhibition_id,
            &attendee.to_attendee(),
            attendee.company_name.as_deref(),
        )
        .await
        .map_err(|e| ApiError::Internal(format!("Badge rendering failed: {}", e)))?
        .ok_or_else(|| ApiError::NotFound("Exhibition not found".to_string()))?;

    info!(attendee_id, bytes = pdf.len(), "Badge rendered");

    let filename = badge_filename(&attendee.full_name, attendee.id);
    Ok(binary_response(pdf, "application/pdf", &filename))
}

/// Retrieve a zip archive of badges for an exhibition.
///
/// GET /api/v1/exhibitions/:exhibition_id/badges?exhibitor_id=
///
/// Always returns a usable archive; per-attendee failures are skipped and
/// the attempted/succeeded counts are reported in response headers.
pub async fn get_badge_archive(
    State(state): State<AppState>,
    Path(exhibition_id): Path<i64>,
    Query(query): Query<BulkQuery>,
) -> Result<Response, ApiError> {
    let exhibitions = ExhibitionRepository::new(state.pool.clone());
    exhibitions
        .find_by_id(exhibition_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Exhibition not found".to_string()))?;

    let repo = AttendeeRepository::new(state.pool.clone());
    let attendees = repo
        .list_for_exhibition(exhibition_id, query.exhibitor_id)
        .await?;

    let renderer = state.badge_renderer();
    let outcome = BadgeArchiveBuilder::build(&attendees, |attendee| {
        let entity = attendee.to_attendee();
        let company = attendee.company_name.clone();
        let renderer = renderer.clone();
        async move {
            renderer
                .render(exhibition_id, &entity, company.as_deref())
                .await
        }
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Archive assembly failed: {}", e)))?;

    record_badges_rendered(outcome.succeeded);
    info!(
        exhibition_id,
        attempted = outcome.attempted,
        succeeded = outcome.succeeded,
        "Badge archive ready"
    );

    let filename = format!("badges_{}.zip", exhibition_id);
    let mut response = binary_response(outcome.bytes, "application/zip", &filename);
    let headers = response.headers_mut();
    headers.insert(
        "X-Badges-Attempted",
        HeaderValue::from(outcome.attempted as u64),
    );
    headers.insert(
        "X-Badges-Succeeded",
        HeaderValue::from(outcome.succeeded as u64),
    );
    Ok(response)
}

/// Retrieve an attendee's QR identifier.
///
/// GET /api/v1/attendees/:attendee_id/qr?format=json|png
///
/// `format=png` returns the raw symbol; anything else returns the JSON
/// descriptor with a link to the image variant.
pub async fn get_qr(
    State(state): State<AppState>,
    Path(attendee_id): Path<i64>,
    Query(query): Query<QrQuery>,
) -> Result<Response, ApiError> {
    let repo = AttendeeRepository::new(state.pool.clone());
    let attendee = repo
        .find_with_context(attendee_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Attendee not found".to_string()))?;

    // Same rule as badge rendering: prefer the stored code, otherwise
    // synthesize a display-only value without persisting it.
    let code = match &attendee.access_code {
        Some(code) => code.clone(),
        None => domain::models::generate_access_code(
            &attendee.exhibition_name,
            attendee.exhibition_id,
            attendee.exhibitor_id,
        ),
    };

    if query.format.as_deref() == Some("png") {
        let png = QrEncoder::encode_png(&code, state.config.rendering.qr_resolution_px)
            .map_err(|e| ApiError::Internal(format!("QR encoding failed: {}", e)))?;
        let filename = format!("qr_{}_{}.png", sanitize_filename_component(&attendee.full_name), attendee.id);
        return Ok(binary_response(png, "image/png", &filename));
    }

    Ok(Json(QrDescriptorResponse {
        attendee_id: attendee.id,
        code,
        full_name: attendee.full_name.clone(),
        company_name: attendee.company_name.clone(),
        exhibition_name: attendee.exhibition_name.clone(),
        image_url: format!("/api/v1/attendees/{}/qr?format=png", attendee.id),
    })
    .into_response())
}

/// Suggested download filename for a single badge.
fn badge_filename(full_name: &str, attendee_id: i64) -> String {
    format!(
        "badge_{}_{}.pdf",
        sanitize_filename_component(full_name),
        attendee_id
    )
}

/// Binary response with content type and attachment disposition.
fn binary_response(bytes: Vec<u8>, content_type: &str, filename: &str) -> Response {
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(content_type) {
        headers.insert(header::CONTENT_TYPE, value);
    }
    // from_bytes: sanitized filenames may still carry non-ASCII letters.
    if let Ok(value) =
        HeaderValue::from_bytes(format!("attachment; filename=\"{}\"", filename).as_bytes())
    {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    (headers, bytes).into_response()
}
