use crate::models::{Notice, NoticeView, Role, User, UserCredentials};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

/// Repository Trait
///
/// Defines the abstract contract for all persistence operations. This is the core
/// of the Repository Abstraction pattern, allowing the handlers to interact with
/// the data layer without knowing the specific implementation (Postgres, Mock, etc.).
///
/// **Send + Sync + async_trait** are required to make the trait object (`Arc<dyn Repository>`)
/// safely shareable and usable across Axum's asynchronous task boundaries.
///
/// Every method reports store failures as `sqlx::Error`; the handler layer maps
/// them to a generic server error instead of leaking storage details.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Notice Retrieval ---

    /// Unfiltered listing (admin and student view), poster joined, newest first.
    async fn list_notices(&self) -> Result<Vec<NoticeView>, sqlx::Error>;

    /// Teacher view: admin-authored notices plus the teacher's own posts only.
    async fn list_notices_for_teacher(&self, teacher_id: i32)
    -> Result<Vec<NoticeView>, sqlx::Error>;

    // --- Notice Actions ---

    /// Inserts a notice with a store-assigned timestamp and returns the created row.
    async fn create_notice(
        &self,
        title: &str,
        content: &str,
        teacher_id: i32,
    ) -> Result<Notice, sqlx::Error>;

    /// Admin override: deletes any notice by id. Returns whether a row was removed.
    async fn delete_notice(&self, id: i32) -> Result<bool, sqlx::Error>;

    /// Owner-only delete: a single conditional statement, so two racing
    /// deletions cannot hit a check-then-act gap.
    async fn delete_notice_owned(&self, id: i32, teacher_id: i32) -> Result<bool, sqlx::Error>;

    /// Existence probe used to classify a failed owned delete (absent vs not owned).
    async fn notice_exists(&self, id: i32) -> Result<bool, sqlx::Error>;

    /// Bulk-removes notices older than `days`. The cutoff is evaluated by the
    /// store at execution time, never precomputed by the caller. Returns the
    /// exact number of rows removed.
    async fn purge_notices_older_than(&self, days: i32) -> Result<u64, sqlx::Error>;

    // --- User/Auth ---

    async fn get_user(&self, id: i32) -> Result<Option<User>, sqlx::Error>;
    async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>, sqlx::Error>;
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, sqlx::Error>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer access across the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by the PostgreSQL database.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    /// list_notices
    ///
    /// Retrieves every notice with the poster's name and role joined in.
    /// The join is a LEFT JOIN so unattributed notices (null teacher_id)
    /// still appear, with null poster fields.
    async fn list_notices(&self) -> Result<Vec<NoticeView>, sqlx::Error> {
        sqlx::query_as::<_, NoticeView>(
            r#"
            SELECT n.id, n.title, n.content, n.teacher_id, n."date" AS date,
                   u.username AS poster_name, u.role AS poster_role
            FROM notices n
            LEFT JOIN users u ON n.teacher_id = u.id
            ORDER BY n."date" DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// list_notices_for_teacher
    ///
    /// The teacher visibility rule, enforced in the query itself: a teacher
    /// sees institution-wide (admin-authored) announcements plus their own
    /// posts, never a peer's.
    async fn list_notices_for_teacher(
        &self,
        teacher_id: i32,
    ) -> Result<Vec<NoticeView>, sqlx::Error> {
        sqlx::query_as::<_, NoticeView>(
            r#"
            SELECT n.id, n.title, n.content, n.teacher_id, n."date" AS date,
                   u.username AS poster_name, u.role AS poster_role
            FROM notices n
            LEFT JOIN users u ON n.teacher_id = u.id
            WHERE u.role = 'admin' OR n.teacher_id = $1
            ORDER BY n."date" DESC
            "#,
        )
        .bind(teacher_id)
        .fetch_all(&self.pool)
        .await
    }

    /// create_notice
    ///
    /// Inserts a new notice. The timestamp comes from the database's NOW(),
    /// making it server-assigned and immutable from the client's perspective.
    async fn create_notice(
        &self,
        title: &str,
        content: &str,
        teacher_id: i32,
    ) -> Result<Notice, sqlx::Error> {
        sqlx::query_as::<_, Notice>(
            r#"
            INSERT INTO notices (title, content, teacher_id)
            VALUES ($1, $2, $3)
            RETURNING id, title, content, teacher_id, "date" AS date
            "#,
        )
        .bind(title)
        .bind(content)
        .bind(teacher_id)
        .fetch_one(&self.pool)
        .await
    }

    /// delete_notice
    ///
    /// **Admin Override**: deletes a notice without an ownership check.
    async fn delete_notice(&self, id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notices WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// delete_notice_owned
    ///
    /// Deletes a notice only if `teacher_id` matches the creator. This is the
    /// **Owner-Only** authorization check, expressed as one conditional
    /// statement rather than a lookup followed by a delete.
    async fn delete_notice_owned(&self, id: i32, teacher_id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notices WHERE id = $1 AND teacher_id = $2")
            .bind(id)
            .bind(teacher_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// notice_exists
    async fn notice_exists(&self, id: i32) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM notices WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
    }

    /// purge_notices_older_than
    ///
    /// Bulk deletion with the cutoff computed inside the statement. A notice
    /// created after the purge started can never fall behind the cutoff, so
    /// concurrent creates are safe.
    async fn purge_notices_older_than(&self, days: i32) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query(r#"DELETE FROM notices WHERE "date" < NOW() - make_interval(days => $1)"#)
                .bind(days)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }

    /// get_user
    ///
    /// Retrieves the identity record (id, username, role) needed for
    /// authentication and authorization.
    async fn get_user(&self, id: i32) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT id, username, role FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// find_user_by_username
    ///
    /// Login lookup; the only query that touches the credential column.
    async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>, sqlx::Error> {
        sqlx::query_as::<_, UserCredentials>(
            "SELECT id, username, password_hash, role FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
    }

    /// create_user
    ///
    /// Persists a new account. Duplicate usernames surface as a unique
    /// violation for the caller to map; the handler treats that as a
    /// validation failure so the insert race is covered, not just the
    /// pre-check.
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, role)
            VALUES ($1, $2, $3)
            RETURNING id, username, role
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(role)
        .fetch_one(&self.pool)
        .await
    }
}
