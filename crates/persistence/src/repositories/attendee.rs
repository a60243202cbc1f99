//! Attendee repository for database operations.

use sqlx::PgPool;

use crate::entities::{AttendeeEntity, AttendeeWithContextEntity};
use crate::metrics::QueryTimer;

/// Columns of the denormalized attendee row shared by the context queries.
const CONTEXT_COLUMNS: &str = r#"
    a.id, a.exhibition_id, a.exhibitor_id, a.full_name, a.role_title,
    a.email, a.access_code, a.created_at,
    x.company_name,
    e.name as exhibition_name,
    e.starts_on as exhibition_starts_on,
    e.ends_on as exhibition_ends_on,
    e.location as exhibition_location,
    e.status as exhibition_status
"#;

/// Repository for attendee-related database operations.
#[derive(Clone)]
pub struct AttendeeRepository {
    pool: PgPool,
}

impl AttendeeRepository {
    /// Creates a new AttendeeRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find attendee by ID.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<AttendeeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_attendee_by_id");
        let result = sqlx::query_as::<_, AttendeeEntity>(
            r#"
            SELECT id, exhibition_id, exhibitor_id, full_name, role_title, email, access_code, created_at
            FROM attendees
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find attendee by ID with exhibitor and exhibition context.
    pub async fn find_with_context(
        &self,
        id: i64,
    ) -> Result<Option<AttendeeWithContextEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_attendee_with_context");
        let result = sqlx::query_as::<_, AttendeeWithContextEntity>(&format!(
            r#"
            SELECT {CONTEXT_COLUMNS}
            FROM attendees a
            JOIN exhibitions e ON a.exhibition_id = e.id
            LEFT JOIN exhibitors x ON a.exhibitor_id = x.id
            WHERE a.id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find attendee by access code for gate verification.
    ///
    /// Rows without a code are excluded from the lookup universe; a blank
    /// scanned value can never match a blank stored value.
    pub async fn find_by_access_code(
        &self,
        code: &str,
    ) -> Result<Option<AttendeeWithContextEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_attendee_by_access_code");
        let result = sqlx::query_as::<_, AttendeeWithContextEntity>(&format!(
            r#"
            SELECT {CONTEXT_COLUMNS}
            FROM attendees a
            JOIN exhibitions e ON a.exhibition_id = e.id
            LEFT JOIN exhibitors x ON a.exhibitor_id = x.id
            WHERE a.access_code IS NOT NULL AND a.access_code = $1
            "#,
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List attendees of an exhibition, optionally filtered by exhibitor.
    pub async fn list_for_exhibition(
        &self,
        exhibition_id: i64,
        exhibitor_id: Option<i64>,
    ) -> Result<Vec<AttendeeWithContextEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_attendees_for_exhibition");
        let result = sqlx::query_as::<_, AttendeeWithContextEntity>(&format!(
            r#"
            SELECT {CONTEXT_COLUMNS}
            FROM attendees a
            JOIN exhibitions e ON a.exhibition_id = e.id
            LEFT JOIN exhibitors x ON a.exhibitor_id = x.id
            WHERE a.exhibition_id = $1
              AND ($2::bigint IS NULL OR a.exhibitor_id = $2)
            ORDER BY x.company_name NULLS LAST, a.full_name, a.id
            "#,
        ))
        .bind(exhibition_id)
        .bind(exhibitor_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List legacy attendee rows of an exhibition that still lack a code.
    pub async fn list_missing_codes(
        &self,
        exhibition_id: i64,
    ) -> Result<Vec<AttendeeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_attendees_missing_codes");
        let result = sqlx::query_as::<_, AttendeeEntity>(
            r#"
            SELECT id, exhibition_id, exhibitor_id, full_name, role_title, email, access_code, created_at
            FROM attendees
            WHERE exhibition_id = $1 AND access_code IS NULL
            ORDER BY id
            "#,
        )
        .bind(exhibition_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Set an attendee's access code, once.
    ///
    /// The predicate enforces the write-once invariant: rows that already
    /// carry a code are left untouched and report zero affected rows.
    pub async fn set_access_code(&self, id: i64, code: &str) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("set_attendee_access_code");
        let result = sqlx::query(
            r#"
            UPDATE attendees
            SET access_code = $2
            WHERE id = $1 AND access_code IS NULL
            "#,
        )
        .bind(id)
        .bind(code)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
