use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// JSON body returned by every failing endpoint: `{"error": "..."}`.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

/// ApiError
///
/// The application-level failure taxonomy. Every handler returns
/// `Result<_, ApiError>` and every variant maps to exactly one status code,
/// so the authorization rules stay in the handlers and the wire mapping
/// stays here.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request carried no valid session credential.
    #[error("Authentication required")]
    Unauthorized,

    /// The requester's role or ownership check failed.
    #[error("{0}")]
    Forbidden(&'static str),

    /// The referenced entity does not exist.
    #[error("{0}")]
    NotFound(&'static str),

    /// Malformed or conflicting input.
    #[error("{0}")]
    Validation(String),

    /// Persistence collaborator failure. Logged with detail server-side,
    /// surfaced to the client as a generic message.
    #[error("Server error")]
    Store(#[from] sqlx::Error),

    /// Non-store server-side failure (credential hashing, token signing).
    /// Same outward treatment as `Store`.
    #[error("Server error")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(e) => {
                tracing::error!("store error: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Internal(detail) => {
                tracing::error!("internal error: {}", detail);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ErrorBody {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
