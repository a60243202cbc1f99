//! Catalog entry entity (database row mapping).
//!
//! Catalog entries are owned by an external subsystem; this crate reads
//! only the exhibitor logo column. A row with a null exhibition_id is the
//! exhibitor's GLOBAL (exhibition-independent) default.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database row mapping for the catalog_entries table.
#[derive(Debug, Clone, FromRow)]
pub struct CatalogEntryEntity {
    pub id: i64,
    pub exhibitor_id: i64,
    /// Null marks the GLOBAL entry.
    pub exhibition_id: Option<i64>,
    /// Loosely-typed logo reference, same shapes as branding asset sources.
    pub logo: Option<String>,
    pub updated_at: DateTime<Utc>,
}
