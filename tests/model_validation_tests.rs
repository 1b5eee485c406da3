use chrono::Utc;
use notice_board::models::{
    LoginResponse, Notice, NoticeView, RegisterUserRequest, Role, User,
};

// --- Tests ---

#[test]
fn test_role_json_is_lowercase() {
    // The wire contract uses lowercase role strings ("admin"/"teacher"/"student").
    assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), r#""admin""#);
    assert_eq!(serde_json::to_string(&Role::Teacher).unwrap(), r#""teacher""#);
    assert_eq!(serde_json::to_string(&Role::Student).unwrap(), r#""student""#);

    let parsed: Role = serde_json::from_str(r#""teacher""#).unwrap();
    assert_eq!(parsed, Role::Teacher);
}

#[test]
fn test_role_rejects_unknown_values() {
    // A payload carrying a role outside the closed set must fail to parse,
    // so it never reaches the authorization rules.
    let result = serde_json::from_str::<Role>(r#""superuser""#);
    assert!(result.is_err());

    let request = serde_json::from_str::<RegisterUserRequest>(
        r#"{"username": "eve", "password": "pw", "role": "root"}"#,
    );
    assert!(request.is_err());
}

#[test]
fn test_register_request_accepts_admin_for_handler_rejection() {
    // "admin" is a valid Role value at the serde layer; the handler rejects it
    // with a validation error. The parse itself must succeed so the rejection
    // is a 400 with a meaningful message, not a deserialization failure.
    let request: RegisterUserRequest = serde_json::from_str(
        r#"{"username": "eve", "password": "pw", "role": "admin"}"#,
    )
    .unwrap();
    assert_eq!(request.role, Role::Admin);
}

#[test]
fn test_notice_view_json_keys() {
    // The UI reads poster_name/poster_role off each notice; the keys must
    // survive serialization exactly.
    let view = NoticeView {
        id: 7,
        title: "Sports day".to_string(),
        content: "Friday on the main field".to_string(),
        teacher_id: Some(3),
        date: Utc::now(),
        poster_name: Some("ms_smith".to_string()),
        poster_role: Some(Role::Teacher),
    };

    let json = serde_json::to_string(&view).unwrap();
    assert!(json.contains(r#""poster_name":"ms_smith""#));
    assert!(json.contains(r#""poster_role":"teacher""#));
    assert!(json.contains(r#""teacher_id":3"#));
}

#[test]
fn test_notice_view_unattributed_poster_is_null() {
    let view = NoticeView {
        id: 1,
        title: "t".to_string(),
        content: "c".to_string(),
        teacher_id: None,
        date: Utc::now(),
        poster_name: None,
        poster_role: None,
    };

    let json = serde_json::to_string(&view).unwrap();
    assert!(json.contains(r#""poster_role":null"#));
    assert!(json.contains(r#""teacher_id":null"#));
}

#[test]
fn test_login_response_shape() {
    // The client stores token, role and id from this exact shape.
    let response = LoginResponse {
        token: "abc.def.ghi".to_string(),
        role: Role::Admin,
        id: 1,
    };

    let json = serde_json::to_string(&response).unwrap();
    assert!(json.contains(r#""token":"abc.def.ghi""#));
    assert!(json.contains(r#""role":"admin""#));
    assert!(json.contains(r#""id":1"#));
}

#[test]
fn test_user_json_never_carries_a_credential() {
    // The serializable identity record has no credential field at all; the
    // hash only lives on the non-serializable lookup record.
    let user = User {
        id: 2,
        username: "ms_smith".to_string(),
        role: Role::Teacher,
    };

    let json = serde_json::to_string(&user).unwrap();
    assert!(!json.contains("password"));
    assert!(json.contains(r#""username":"ms_smith""#));
}

#[test]
fn test_notice_round_trips_with_server_assigned_date() {
    let notice = Notice {
        id: 10,
        title: "Exam Friday".to_string(),
        content: "Room 204, 9am".to_string(),
        teacher_id: Some(2),
        date: Utc::now(),
    };

    let json = serde_json::to_string(&notice).unwrap();
    let back: Notice = serde_json::from_str(&json).unwrap();
    assert_eq!(back.id, notice.id);
    assert_eq!(back.date, notice.date);
}
