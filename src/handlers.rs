use crate::{
    AppState,
    auth::{AuthUser, issue_token},
    config::{NOTICE_FEED_DAYS, RETENTION_WINDOW_DAYS},
    error::ApiError,
    feed::{DayBucket, build_feed},
    models::{
        CreateNoticeRequest, LoginRequest, LoginResponse, Notice, NoticeView, PurgeResponse,
        RegisterUserRequest, Role, User,
    },
    passwords,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;

/// login
///
/// [Public Route] Exchanges a username/password pair for a signed session token.
///
/// *Security*: the stored credential is a salted argon2 hash; a missing user
/// and a wrong password produce the same response, so usernames cannot be
/// probed.
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 400, description = "Invalid username or password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state
        .repo
        .find_user_by_username(&payload.username)
        .await?
        .ok_or_else(|| ApiError::Validation("Invalid username or password".to_string()))?;

    let valid = passwords::verify_password(&payload.password, &user.password_hash)
        .map_err(|e| ApiError::Internal(format!("password verify: {}", e)))?;
    if !valid {
        return Err(ApiError::Validation(
            "Invalid username or password".to_string(),
        ));
    }

    let token = issue_token(user.id, user.role, &state.config.jwt_secret)
        .map_err(|e| ApiError::Internal(format!("token signing: {}", e)))?;

    Ok(Json(LoginResponse {
        token,
        role: user.role,
        id: user.id,
    }))
}

/// get_me
///
/// [Authenticated Route] The resolved identity of the requester, as the
/// session UI needs it (id, username, role).
#[utoipa::path(
    get,
    path = "/api/me",
    responses((status = 200, description = "Profile", body = User))
)]
pub async fn get_me(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<User>, ApiError> {
    let user = state.repo.get_user(id).await?.ok_or(ApiError::Unauthorized)?;
    Ok(Json(user))
}

/// visible_notices
///
/// The read-side visibility rule, in one place for the list and feed
/// handlers. Teachers see admin-authored notices plus their own posts;
/// admins and students see everything. The match is exhaustive so a new
/// role cannot ship without a visibility decision.
async fn visible_notices(state: &AppState, requester: &AuthUser) -> Result<Vec<NoticeView>, ApiError> {
    let notices = match requester.role {
        Role::Teacher => state.repo.list_notices_for_teacher(requester.id).await?,
        Role::Admin | Role::Student => state.repo.list_notices().await?,
    };
    Ok(notices)
}

/// list_notices
///
/// [Authenticated Route] Lists the notices visible to the requester,
/// newest first (ordering applied at the query layer).
#[utoipa::path(
    get,
    path = "/api/notices",
    responses((status = 200, description = "Visible notices", body = [NoticeView]))
)]
pub async fn list_notices(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<NoticeView>>, ApiError> {
    let notices = visible_notices(&state, &auth).await?;
    Ok(Json(notices))
}

/// get_notice_feed
///
/// [Authenticated Route] The day-tab feed: the requester's visible notices
/// bucketed over the rolling 30-day window, one bucket per day ascending,
/// admin posts first within each day.
#[utoipa::path(
    get,
    path = "/api/notices/feed",
    responses((status = 200, description = "Day feed", body = [DayBucket]))
)]
pub async fn get_notice_feed(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<DayBucket>>, ApiError> {
    let notices = visible_notices(&state, &auth).await?;
    let feed = build_feed(notices, Utc::now().date_naive(), NOTICE_FEED_DAYS);
    Ok(Json(feed))
}

/// create_notice
///
/// [Authenticated Route] Posts a new notice. Restricted to teachers and
/// admins; the creator attribution and timestamp come from the session and
/// the store, never from the payload.
#[utoipa::path(
    post,
    path = "/api/notices",
    request_body = CreateNoticeRequest,
    responses(
        (status = 201, description = "Created", body = Notice),
        (status = 403, description = "Students cannot post")
    )
)]
pub async fn create_notice(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateNoticeRequest>,
) -> Result<(StatusCode, Json<Notice>), ApiError> {
    match auth.role {
        Role::Teacher | Role::Admin => {}
        Role::Student => {
            return Err(ApiError::Forbidden("Only teachers and admins can post notices"));
        }
    }

    let notice = state
        .repo
        .create_notice(&payload.title, &payload.content, auth.id)
        .await?;

    Ok((StatusCode::CREATED, Json(notice)))
}

/// delete_notice
///
/// [Authenticated Route] Removes a single notice.
///
/// *Authorization*: admins delete unconditionally; teachers only their own
/// posts; students never. The teacher path is a single conditional delete,
/// with an existence probe afterwards only to tell "gone" apart from
/// "not yours" — the probe never gates the delete itself.
#[utoipa::path(
    delete,
    path = "/api/notices/{id}",
    params(("id" = i32, Path, description = "Notice ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Not Owner"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_notice(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    match auth.role {
        Role::Admin => {
            if state.repo.delete_notice(id).await? {
                Ok(StatusCode::NO_CONTENT)
            } else {
                Err(ApiError::NotFound("Notice not found"))
            }
        }
        Role::Teacher => {
            if state.repo.delete_notice_owned(id, auth.id).await? {
                Ok(StatusCode::NO_CONTENT)
            } else if state.repo.notice_exists(id).await? {
                Err(ApiError::Forbidden(
                    "Teachers can only delete their own notices",
                ))
            } else {
                Err(ApiError::NotFound("Notice not found"))
            }
        }
        Role::Student => Err(ApiError::Forbidden("Students cannot delete notices")),
    }
}

/// purge_old_notices
///
/// [Admin Route] Bulk-removes notices older than the fixed retention window.
/// Reports the exact count removed; zero is a distinct "nothing to remove"
/// outcome. The age cutoff is evaluated by the store when the statement
/// runs, so a notice created during the purge can never be caught by it.
#[utoipa::path(
    delete,
    path = "/api/notices/old",
    responses(
        (status = 200, description = "Purge outcome", body = PurgeResponse),
        (status = 403, description = "Admin only")
    )
)]
pub async fn purge_old_notices(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<PurgeResponse>, ApiError> {
    match auth.role {
        Role::Admin => {}
        Role::Teacher | Role::Student => {
            return Err(ApiError::Forbidden("Only admin can delete old notices"));
        }
    }

    let removed = state
        .repo
        .purge_notices_older_than(RETENTION_WINDOW_DAYS)
        .await?;

    let message = if removed == 0 {
        "No old notices exist.".to_string()
    } else {
        format!(
            "Old notices deleted successfully. {} notices removed.",
            removed
        )
    };

    Ok(Json(PurgeResponse { removed, message }))
}

/// register_user
///
/// [Admin Route] Creates a teacher or student account. Admin accounts cannot
/// be created here at all.
///
/// *Validation*: the duplicate-username check runs twice — a friendly
/// pre-check, then the unique constraint on insert — so two racing
/// registrations cannot both succeed.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "Registered", body = User),
        (status = 400, description = "Invalid role or duplicate username"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn register_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<RegisterUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    match auth.role {
        Role::Admin => {}
        Role::Teacher | Role::Student => {
            return Err(ApiError::Forbidden("Only admin can add users"));
        }
    }

    match payload.role {
        Role::Teacher | Role::Student => {}
        Role::Admin => {
            return Err(ApiError::Validation("Invalid role".to_string()));
        }
    }

    if state
        .repo
        .find_user_by_username(&payload.username)
        .await?
        .is_some()
    {
        return Err(ApiError::Validation("Username already exists".to_string()));
    }

    let password_hash = passwords::hash_password(&payload.password)
        .map_err(|e| ApiError::Internal(format!("password hash: {}", e)))?;

    let user = state
        .repo
        .create_user(&payload.username, &password_hash, payload.role)
        .await
        .map_err(|e| {
            // Two registrations can race past the pre-check; the unique
            // constraint settles it.
            if e.as_database_error()
                .is_some_and(|db| db.is_unique_violation())
            {
                ApiError::Validation("Username already exists".to_string())
            } else {
                ApiError::Store(e)
            }
        })?;

    Ok((StatusCode::CREATED, Json(user)))
}
