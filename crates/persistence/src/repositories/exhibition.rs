//! Exhibition repository for database operations.

use sqlx::PgPool;

use crate::entities::ExhibitionEntity;
use crate::metrics::QueryTimer;

/// Repository for exhibition-related database operations.
#[derive(Clone)]
pub struct ExhibitionRepository {
    pool: PgPool,
}

impl ExhibitionRepository {
    /// Creates a new ExhibitionRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find exhibition by ID.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<ExhibitionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_exhibition_by_id");
        let result = sqlx::query_as::<_, ExhibitionEntity>(
            r#"
            SELECT id, name, starts_on, ends_on, location, status,
                   exhibitor_hours, visitor_hours, created_at
            FROM exhibitions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    // Note: ExhibitionRepository tests require database connection and are covered by integration tests
}
