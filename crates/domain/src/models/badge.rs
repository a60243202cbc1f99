//! Badge and QR retrieval response models.

use serde::Serialize;

/// JSON descriptor for an attendee's QR identifier.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct QrDescriptorResponse {
    pub attendee_id: i64,
    /// The QR payload; equals the stored access code verbatim.
    pub code: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    pub exhibition_name: String,
    /// Link to the raster variant of the same symbol.
    pub image_url: String,
}

/// Result of a backfill pass over legacy rows lacking an access code.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct BackfillResponse {
    pub exhibition_id: i64,
    /// Rows that received a freshly generated code in this pass.
    pub generated: u64,
}
