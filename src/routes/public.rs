use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Defines endpoints that are **unauthenticated** and accessible to any client.
/// Everything behind a session token lives in the authenticated/admin modules;
/// the only gateway functions here are the health probe and login.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // A simple, unauthenticated endpoint used for monitoring and load balancer checks.
        // Returns "ok" immediately to verify the service is running and responsive.
        .route("/health", get(|| async { "ok" }))
        // POST /api/login
        // Exchanges username/password for a signed, time-limited session token.
        // Credential verification is a salted-hash comparison in the handler.
        .route("/api/login", post(handlers::login))
}
