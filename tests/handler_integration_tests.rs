use async_trait::async_trait;
use axum::{Json, extract::{Path, State}, http::StatusCode};
use chrono::Utc;
use notice_board::{
    AppState,
    auth::AuthUser,
    config::AppConfig,
    error::ApiError,
    handlers,
    models::{
        CreateNoticeRequest, LoginRequest, Notice, NoticeView, RegisterUserRequest, Role, User,
        UserCredentials,
    },
    passwords,
    repository::Repository,
};
use std::sync::Arc;
use tokio::test;

// --- MOCK REPOSITORY IMPLEMENTATION ---

// This struct is the central control point for testing handler logic.
// Handlers rely on the Repository trait, so we mock the trait implementation
// with pre-canned outputs per method.
pub struct MockRepoControl {
    pub notices_to_return: Vec<NoticeView>,
    pub teacher_notices_to_return: Vec<NoticeView>,
    pub delete_notice_result: bool,
    pub delete_owned_result: bool,
    pub notice_exists_result: bool,
    pub purge_removed: u64,
    pub user_to_return: Option<User>,
    pub credentials_to_return: Option<UserCredentials>,
}

impl Default for MockRepoControl {
    fn default() -> Self {
        MockRepoControl {
            notices_to_return: vec![],
            teacher_notices_to_return: vec![],
            delete_notice_result: false,
            delete_owned_result: false,
            notice_exists_result: false,
            purge_removed: 0,
            user_to_return: None,
            credentials_to_return: None,
        }
    }
}

#[async_trait]
impl Repository for MockRepoControl {
    async fn list_notices(&self) -> Result<Vec<NoticeView>, sqlx::Error> {
        Ok(self.notices_to_return.clone())
    }
    async fn list_notices_for_teacher(
        &self,
        _teacher_id: i32,
    ) -> Result<Vec<NoticeView>, sqlx::Error> {
        Ok(self.teacher_notices_to_return.clone())
    }
    async fn create_notice(
        &self,
        title: &str,
        content: &str,
        teacher_id: i32,
    ) -> Result<Notice, sqlx::Error> {
        // Echo the inputs back so tests can verify attribution handling.
        Ok(Notice {
            id: 1,
            title: title.to_string(),
            content: content.to_string(),
            teacher_id: Some(teacher_id),
            date: Utc::now(),
        })
    }
    async fn delete_notice(&self, _id: i32) -> Result<bool, sqlx::Error> {
        Ok(self.delete_notice_result)
    }
    async fn delete_notice_owned(&self, _id: i32, _teacher_id: i32) -> Result<bool, sqlx::Error> {
        Ok(self.delete_owned_result)
    }
    async fn notice_exists(&self, _id: i32) -> Result<bool, sqlx::Error> {
        Ok(self.notice_exists_result)
    }
    async fn purge_notices_older_than(&self, _days: i32) -> Result<u64, sqlx::Error> {
        Ok(self.purge_removed)
    }
    async fn get_user(&self, _id: i32) -> Result<Option<User>, sqlx::Error> {
        Ok(self.user_to_return.clone())
    }
    async fn find_user_by_username(
        &self,
        _username: &str,
    ) -> Result<Option<UserCredentials>, sqlx::Error> {
        Ok(self.credentials_to_return.clone())
    }
    async fn create_user(
        &self,
        username: &str,
        _password_hash: &str,
        role: Role,
    ) -> Result<User, sqlx::Error> {
        Ok(User {
            id: 42,
            username: username.to_string(),
            role,
        })
    }
}

// --- TEST UTILITIES ---

// Creates an AppState using the mock repository
fn create_test_state(repo_control: MockRepoControl) -> AppState {
    AppState {
        repo: Arc::new(repo_control),
        config: AppConfig::default(),
    }
}

fn admin_user() -> AuthUser {
    AuthUser {
        id: 1,
        role: Role::Admin,
    }
}
fn teacher_user() -> AuthUser {
    AuthUser {
        id: 2,
        role: Role::Teacher,
    }
}
fn student_user() -> AuthUser {
    AuthUser {
        id: 5,
        role: Role::Student,
    }
}

fn sample_view(id: i32, poster_role: Role) -> NoticeView {
    NoticeView {
        id,
        title: format!("notice {}", id),
        content: "body".to_string(),
        teacher_id: Some(id),
        date: Utc::now(),
        poster_name: Some("poster".to_string()),
        poster_role: Some(poster_role),
    }
}

// --- LISTING (VISIBILITY DISPATCH) ---

#[test]
async fn test_list_notices_teacher_gets_filtered_view() {
    // The filtered and unfiltered canned sets differ, so the assertion proves
    // which repository query the handler dispatched to.
    let state = create_test_state(MockRepoControl {
        notices_to_return: vec![sample_view(1, Role::Teacher), sample_view(2, Role::Admin)],
        teacher_notices_to_return: vec![sample_view(2, Role::Admin)],
        ..MockRepoControl::default()
    });

    let Json(notices) = handlers::list_notices(teacher_user(), State(state))
        .await
        .unwrap();

    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].id, 2);
}

#[test]
async fn test_list_notices_admin_and_student_get_everything() {
    for requester in [admin_user(), student_user()] {
        let state = create_test_state(MockRepoControl {
            notices_to_return: vec![sample_view(1, Role::Teacher), sample_view(2, Role::Admin)],
            teacher_notices_to_return: vec![],
            ..MockRepoControl::default()
        });

        let Json(notices) = handlers::list_notices(requester, State(state))
            .await
            .unwrap();

        assert_eq!(notices.len(), 2);
    }
}

#[test]
async fn test_notice_feed_uses_visibility_dispatch() {
    // A teacher's feed is built from the filtered set only.
    let state = create_test_state(MockRepoControl {
        notices_to_return: vec![sample_view(1, Role::Teacher)],
        teacher_notices_to_return: vec![],
        ..MockRepoControl::default()
    });

    let Json(feed) = handlers::get_notice_feed(teacher_user(), State(state))
        .await
        .unwrap();

    assert!(feed.iter().all(|bucket| bucket.notices.is_empty()));
}

// --- CREATE ---

#[test]
async fn test_create_notice_rejects_student() {
    let state = create_test_state(MockRepoControl::default());

    let result = handlers::create_notice(
        student_user(),
        State(state),
        Json(CreateNoticeRequest {
            title: "t".to_string(),
            content: "c".to_string(),
        }),
    )
    .await;

    assert!(matches!(result, Err(ApiError::Forbidden(_))));
}

#[test]
async fn test_create_notice_attributes_requester() {
    let state = create_test_state(MockRepoControl::default());

    let (status, Json(notice)) = handlers::create_notice(
        teacher_user(),
        State(state),
        Json(CreateNoticeRequest {
            title: "Exam Friday".to_string(),
            content: "Room 204".to_string(),
        }),
    )
    .await
    .unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(notice.title, "Exam Friday");
    // teacher_id always comes from the session, never the payload.
    assert_eq!(notice.teacher_id, Some(teacher_user().id));
}

#[test]
async fn test_create_notice_allows_admin() {
    let state = create_test_state(MockRepoControl::default());

    let result = handlers::create_notice(
        admin_user(),
        State(state),
        Json(CreateNoticeRequest {
            title: "Holiday".to_string(),
            content: "School closed".to_string(),
        }),
    )
    .await;

    assert!(result.is_ok());
}

// --- DELETE ---

#[test]
async fn test_delete_notice_student_always_forbidden() {
    let state = create_test_state(MockRepoControl {
        // Even when the delete would have succeeded.
        delete_notice_result: true,
        delete_owned_result: true,
        ..MockRepoControl::default()
    });

    let result = handlers::delete_notice(student_user(), State(state), Path(1)).await;

    assert!(matches!(result, Err(ApiError::Forbidden(_))));
}

#[test]
async fn test_delete_notice_teacher_owned_succeeds() {
    let state = create_test_state(MockRepoControl {
        delete_owned_result: true,
        ..MockRepoControl::default()
    });

    let status = handlers::delete_notice(teacher_user(), State(state), Path(1))
        .await
        .unwrap();

    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[test]
async fn test_delete_notice_teacher_not_owner_is_forbidden() {
    // Conditional delete removed nothing but the notice exists: not yours.
    let state = create_test_state(MockRepoControl {
        delete_owned_result: false,
        notice_exists_result: true,
        ..MockRepoControl::default()
    });

    let result = handlers::delete_notice(teacher_user(), State(state), Path(1)).await;

    assert!(matches!(result, Err(ApiError::Forbidden(_))));
}

#[test]
async fn test_delete_notice_teacher_missing_is_not_found() {
    let state = create_test_state(MockRepoControl {
        delete_owned_result: false,
        notice_exists_result: false,
        ..MockRepoControl::default()
    });

    let result = handlers::delete_notice(teacher_user(), State(state), Path(99)).await;

    assert!(matches!(result, Err(ApiError::NotFound(_))));
}

#[test]
async fn test_delete_notice_admin_unconditional() {
    let state = create_test_state(MockRepoControl {
        delete_notice_result: true,
        ..MockRepoControl::default()
    });

    let status = handlers::delete_notice(admin_user(), State(state), Path(1))
        .await
        .unwrap();

    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[test]
async fn test_delete_notice_admin_missing_is_not_found() {
    let state = create_test_state(MockRepoControl {
        delete_notice_result: false,
        ..MockRepoControl::default()
    });

    let result = handlers::delete_notice(admin_user(), State(state), Path(99)).await;

    assert!(matches!(result, Err(ApiError::NotFound(_))));
}

// --- PURGE ---

#[test]
async fn test_purge_rejects_non_admin() {
    for requester in [teacher_user(), student_user()] {
        let state = create_test_state(MockRepoControl {
            purge_removed: 3,
            ..MockRepoControl::default()
        });

        let result = handlers::purge_old_notices(requester, State(state)).await;

        assert!(matches!(result, Err(ApiError::Forbidden(_))));
    }
}

#[test]
async fn test_purge_reports_exact_count() {
    let state = create_test_state(MockRepoControl {
        purge_removed: 4,
        ..MockRepoControl::default()
    });

    let Json(outcome) = handlers::purge_old_notices(admin_user(), State(state))
        .await
        .unwrap();

    assert_eq!(outcome.removed, 4);
    assert!(outcome.message.contains("4 notices removed"));
}

#[test]
async fn test_purge_zero_removed_is_a_distinct_outcome() {
    let state = create_test_state(MockRepoControl {
        purge_removed: 0,
        ..MockRepoControl::default()
    });

    let Json(outcome) = handlers::purge_old_notices(admin_user(), State(state))
        .await
        .unwrap();

    assert_eq!(outcome.removed, 0);
    assert_eq!(outcome.message, "No old notices exist.");
}

// --- REGISTER USER ---

fn register_payload(role: Role) -> RegisterUserRequest {
    RegisterUserRequest {
        username: "new_user".to_string(),
        password: "pw123456".to_string(),
        role,
    }
}

#[test]
async fn test_register_user_rejects_non_admin() {
    for requester in [teacher_user(), student_user()] {
        let state = create_test_state(MockRepoControl::default());

        let result =
            handlers::register_user(requester, State(state), Json(register_payload(Role::Student)))
                .await;

        assert!(matches!(result, Err(ApiError::Forbidden(_))));
    }
}

#[test]
async fn test_register_user_rejects_admin_role() {
    let state = create_test_state(MockRepoControl::default());

    let result =
        handlers::register_user(admin_user(), State(state), Json(register_payload(Role::Admin)))
            .await;

    assert!(matches!(result, Err(ApiError::Validation(_))));
}

#[test]
async fn test_register_user_rejects_duplicate_username() {
    let state = create_test_state(MockRepoControl {
        credentials_to_return: Some(UserCredentials {
            id: 9,
            username: "new_user".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            role: Role::Teacher,
        }),
        ..MockRepoControl::default()
    });

    let result =
        handlers::register_user(admin_user(), State(state), Json(register_payload(Role::Teacher)))
            .await;

    assert!(matches!(result, Err(ApiError::Validation(_))));
}

#[test]
async fn test_register_user_success() {
    let state = create_test_state(MockRepoControl::default());

    let (status, Json(user)) =
        handlers::register_user(admin_user(), State(state), Json(register_payload(Role::Teacher)))
            .await
            .unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user.username, "new_user");
    assert_eq!(user.role, Role::Teacher);
}

// --- LOGIN ---

#[test]
async fn test_login_unknown_user_and_bad_password_look_identical() {
    let hash = passwords::hash_password("right-password").unwrap();

    // Unknown username
    let state = create_test_state(MockRepoControl::default());
    let missing = handlers::login(
        State(state),
        Json(LoginRequest {
            username: "ghost".to_string(),
            password: "whatever".to_string(),
        }),
    )
    .await;

    // Known username, wrong password
    let state = create_test_state(MockRepoControl {
        credentials_to_return: Some(UserCredentials {
            id: 1,
            username: "real".to_string(),
            password_hash: hash,
            role: Role::Student,
        }),
        ..MockRepoControl::default()
    });
    let wrong = handlers::login(
        State(state),
        Json(LoginRequest {
            username: "real".to_string(),
            password: "wrong-password".to_string(),
        }),
    )
    .await;

    let missing_msg = match missing {
        Err(ApiError::Validation(msg)) => msg,
        other => panic!("expected validation error, got {:?}", other.is_ok()),
    };
    let wrong_msg = match wrong {
        Err(ApiError::Validation(msg)) => msg,
        other => panic!("expected validation error, got {:?}", other.is_ok()),
    };
    assert_eq!(missing_msg, wrong_msg, "no username probing");
}

#[test]
async fn test_login_success_issues_token() {
    let hash = passwords::hash_password("s3cret").unwrap();
    let state = create_test_state(MockRepoControl {
        credentials_to_return: Some(UserCredentials {
            id: 7,
            username: "ms_smith".to_string(),
            password_hash: hash,
            role: Role::Teacher,
        }),
        ..MockRepoControl::default()
    });

    let Json(response) = handlers::login(
        State(state),
        Json(LoginRequest {
            username: "ms_smith".to_string(),
            password: "s3cret".to_string(),
        }),
    )
    .await
    .unwrap();

    assert_eq!(response.id, 7);
    assert_eq!(response.role, Role::Teacher);
    assert!(!response.token.is_empty());
}
