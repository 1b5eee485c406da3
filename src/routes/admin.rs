use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, post},
};

/// Admin Router Module
///
/// Defines the routes exclusively meaningful to users with the 'admin' role:
/// account provisioning and bulk retention cleanup.
///
/// Access Control:
/// These handlers authenticate via the `AuthUser` extractor and then
/// explicitly check for the admin role before touching the store, so a
/// non-admin session reaching these paths is rejected with 403.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // POST /api/users
        // Creates a teacher or student account with a hashed credential.
        // Admin accounts are never self-service created; requests carrying
        // role=admin are rejected as invalid.
        .route("/api/users", post(handlers::register_user))
        // DELETE /api/notices/old
        // Bulk-removes notices older than the fixed retention window and
        // reports the exact count. The static "old" segment takes priority
        // over the dynamic /api/notices/{id} route.
        .route("/api/notices/old", delete(handlers::purge_old_notices))
}
