use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;

// --- Core Application Schemas (Mapped to Database) ---

/// Role
///
/// The closed set of account roles. Stored as lowercase TEXT in the `users`
/// table and serialized lowercase in JSON. Every authorization rule in the
/// handlers matches on this enum exhaustively, so adding a role without
/// updating each rule is a compile-time error.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, sqlx::Type, Default,
)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Teacher,
    #[default]
    Student,
}

/// User
///
/// The public identity record from the `users` table: everything about an
/// account except its credential.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct User {
    pub id: i32,
    pub username: String,
    // The RBAC field: 'admin', 'teacher' or 'student'.
    pub role: Role,
}

/// UserCredentials
///
/// Internal login-lookup record. Carries the salted one-way password hash and
/// is deliberately not serializable: the credential is opaque to everything
/// except the verify step.
#[derive(Debug, Clone, FromRow)]
pub struct UserCredentials {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

/// Notice
///
/// A dated announcement record from the `notices` table. `date` is assigned
/// by the store at insertion and never mutated; notices are created and
/// deleted, never updated in place.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Notice {
    pub id: i32,
    pub title: String,
    pub content: String,
    // FK to users.id (creator). Null only for unattributed notices.
    pub teacher_id: Option<i32>,
    #[ts(type = "string")]
    pub date: DateTime<Utc>,
}

/// NoticeView
///
/// A `Notice` enriched at read time with the poster's name and role
/// (LEFT JOIN against `users`). `poster_role` drives both the teacher
/// visibility filter and the admin-first ordering inside a day bucket.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct NoticeView {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub teacher_id: Option<i32>,
    #[ts(type = "string")]
    pub date: DateTime<Utc>,
    // Joined fields; both None when teacher_id is null.
    pub poster_name: Option<String>,
    pub poster_role: Option<Role>,
}

// --- Request Payloads (Input Schemas) ---

/// LoginRequest
///
/// Input payload for POST /api/login. The password is consumed by the argon2
/// verify step and never persisted or logged.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// CreateNoticeRequest
///
/// Input payload for posting a new notice. Title and content are accepted
/// as-is; the creator and timestamp are taken from the session and the store,
/// never from the client.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateNoticeRequest {
    pub title: String,
    pub content: String,
}

/// RegisterUserRequest
///
/// Input payload for the admin-only user registration endpoint. `role` is
/// restricted to teacher/student in the handler: admin accounts are never
/// self-service created.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct RegisterUserRequest {
    pub username: String,
    pub password: String,
    pub role: Role,
}

// --- Response Schemas (Output) ---

/// LoginResponse
///
/// Output of a successful login: the signed session token plus the identity
/// the client UI needs for its delete affordances.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
    pub id: i32,
}

/// PurgeResponse
///
/// Outcome of a bulk purge. `removed == 0` is the distinct "nothing to
/// remove" outcome, not an error.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct PurgeResponse {
    pub removed: u64,
    pub message: String,
}
