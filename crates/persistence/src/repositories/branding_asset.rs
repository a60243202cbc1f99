//! Branding asset repository for database operations.

use sqlx::PgPool;

use crate::entities::{AssetRoleDb, BrandingAssetEntity};
use crate::metrics::QueryTimer;

/// Repository for branding-asset database operations.
#[derive(Clone)]
pub struct BrandingAssetRepository {
    pool: PgPool,
}

impl BrandingAssetRepository {
    /// Creates a new BrandingAssetRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Most recent exhibitor-scoped asset for a role within an exhibition.
    pub async fn find_current_for_exhibitor(
        &self,
        exhibition_id: i64,
        exhibitor_id: i64,
        role: AssetRoleDb,
    ) -> Result<Option<BrandingAssetEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_branding_asset_for_exhibitor");
        let result = sqlx::query_as::<_, BrandingAssetEntity>(
            r#"
            SELECT id, exhibition_id, exhibitor_id, role, source, created_at
            FROM branding_assets
            WHERE exhibition_id = $1 AND exhibitor_id = $2 AND role = $3
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(exhibition_id)
        .bind(exhibitor_id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Most recent event-scoped (exhibitor-null) asset for a role.
    pub async fn find_current_for_event(
        &self,
        exhibition_id: i64,
        role: AssetRoleDb,
    ) -> Result<Option<BrandingAssetEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_branding_asset_for_event");
        let result = sqlx::query_as::<_, BrandingAssetEntity>(
            r#"
            SELECT id, exhibition_id, exhibitor_id, role, source, created_at
            FROM branding_assets
            WHERE exhibition_id = $1 AND exhibitor_id IS NULL AND role = $2
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(exhibition_id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}
