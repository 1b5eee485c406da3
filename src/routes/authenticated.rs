use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, get},
};

/// Authenticated Router Module
///
/// Defines the routes accessible to any user who has successfully passed the
/// authentication layer: reading the notice board and, for teachers and
/// admins, posting and deleting.
///
/// Access Control Strategy:
/// Every handler in this module relies on the `AuthUser` extractor middleware being present
/// on the router layer above this module. This guarantees that all handlers receive a
/// validated `AuthUser` struct containing the user's id and role, which is then used
/// for the role and ownership checks (e.g., in `create_notice` and `delete_notice`).
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /api/me
        // Retrieves the currently authenticated user's identity.
        .route("/api/me", get(handlers::get_me))
        // GET /api/notices
        // Lists the notices visible to the requester, newest first. Teachers
        // get the filtered view (admin posts + their own); admins and
        // students get everything.
        // POST /api/notices
        // Posts a new notice. The handler rejects students; attribution and
        // timestamp are server-assigned.
        .route(
            "/api/notices",
            get(handlers::list_notices).post(handlers::create_notice),
        )
        // GET /api/notices/feed
        // The day-tab feed: visible notices bucketed per calendar day over
        // the rolling 30-day window, admin posts first within each day.
        .route("/api/notices/feed", get(handlers::get_notice_feed))
        // DELETE /api/notices/{id}
        // Removes a notice. Admins unconditionally; teachers only their own
        // (a single conditional delete, so racing deletions are safe);
        // students never.
        .route("/api/notices/{id}", delete(handlers::delete_notice))
}
