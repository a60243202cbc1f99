//! Catalog entry repository (read-only).
//!
//! The GLOBAL-vs-per-exhibition override policy is owned by the catalog
//! subsystem; this repository only exposes the two lookups the badge
//! renderer needs.

use sqlx::PgPool;

use crate::entities::CatalogEntryEntity;
use crate::metrics::QueryTimer;

/// Read-only repository for exhibitor catalog entries.
#[derive(Clone)]
pub struct CatalogEntryRepository {
    pool: PgPool,
}

impl CatalogEntryRepository {
    /// Creates a new CatalogEntryRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The exhibitor's catalog entry scoped to one exhibition.
    pub async fn find_for_exhibition(
        &self,
        exhibitor_id: i64,
        exhibition_id: i64,
    ) -> Result<Option<CatalogEntryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_catalog_entry_for_exhibition");
        let result = sqlx::query_as::<_, CatalogEntryEntity>(
            r#"
            SELECT id, exhibitor_id, exhibition_id, logo, updated_at
            FROM catalog_entries
            WHERE exhibitor_id = $1 AND exhibition_id = $2
            ORDER BY updated_at DESC
            LIMIT 1
            "#,
        )
        .bind(exhibitor_id)
        .bind(exhibition_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// The exhibitor's GLOBAL (exhibition-independent) catalog entry.
    pub async fn find_global(
        &self,
        exhibitor_id: i64,
    ) -> Result<Option<CatalogEntryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_catalog_entry_global");
        let result = sqlx::query_as::<_, CatalogEntryEntity>(
            r#"
            SELECT id, exhibitor_id, exhibition_id, logo, updated_at
            FROM catalog_entries
            WHERE exhibitor_id = $1 AND exhibition_id IS NULL
            ORDER BY updated_at DESC
            LIMIT 1
            "#,
        )
        .bind(exhibitor_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}
