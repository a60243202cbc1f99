//! Branding asset entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::AssetRole;
use sqlx::FromRow;

/// Database enum for asset_role that maps to PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "asset_role", rename_all = "snake_case")]
pub enum AssetRoleDb {
    BackgroundWithLogo,
    WhiteLogo,
    EventLogo,
}

impl From<AssetRoleDb> for AssetRole {
    fn from(db_role: AssetRoleDb) -> Self {
        match db_role {
            AssetRoleDb::BackgroundWithLogo => AssetRole::BackgroundWithLogo,
            AssetRoleDb::WhiteLogo => AssetRole::WhiteLogo,
            AssetRoleDb::EventLogo => AssetRole::EventLogo,
        }
    }
}

impl From<AssetRole> for AssetRoleDb {
    fn from(role: AssetRole) -> Self {
        match role {
            AssetRole::BackgroundWithLogo => AssetRoleDb::BackgroundWithLogo,
            AssetRole::WhiteLogo => AssetRoleDb::WhiteLogo,
            AssetRole::EventLogo => AssetRoleDb::EventLogo,
        }
    }
}

/// Database row mapping for the branding_assets table.
#[derive(Debug, Clone, FromRow)]
pub struct BrandingAssetEntity {
    pub id: i64,
    pub exhibition_id: i64,
    /// Null for event-scoped assets owned by the exhibition itself.
    pub exhibitor_id: Option<i64>,
    pub role: AssetRoleDb,
    /// Loosely-typed image reference: data URI, absolute URL, site-relative
    /// API path, or a path relative to the uploads root.
    pub source: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_role_round_trip() {
        for role in AssetRole::HEADER_FALLBACK_ORDER {
            let db: AssetRoleDb = role.into();
            let back: AssetRole = db.into();
            assert_eq!(back, role);
        }
    }
}
