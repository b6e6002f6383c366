//! Tests for users API handlers.

use std::sync::{Arc, Mutex};

use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test};
use async_trait::async_trait;
use chrono::Utc;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{AuthService, UserService};
use crate::domain::{
    AccessToken, AuthResponse, ChangePasswordRequest, ForgotPasswordRequest, LoginRequest,
    Password, RegisterRequest, ResetPasswordRequest, UserRole,
};
use crate::inbound::http::test_utils::{configure, configure_with_state, read_json};
use crate::outbound::InMemoryAccounts;

const ADMIN_TOKEN: &str = "admin-token";

fn admin() -> User {
    let now = Utc::now();
    User {
        id: UserId::random(),
        email: "admin@example.com".to_owned(),
        name: "Admin".to_owned(),
        phone: None,
        role: UserRole::Admin,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

/// Authenticates every request as an admin and records user-service calls.
#[derive(Default)]
struct RecordingPorts {
    calls: Mutex<Vec<&'static str>>,
}

impl RecordingPorts {
    fn record(&self, call: &'static str) {
        self.calls.lock().expect("calls lock").push(call);
    }

    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().expect("calls lock").clone()
    }
}

#[async_trait]
impl AuthService for RecordingPorts {
    async fn register(&self, _: RegisterRequest) -> Result<AuthResponse, Error> {
        Err(Error::internal("unused"))
    }

    async fn login(&self, _: LoginRequest) -> Result<AuthResponse, Error> {
        Err(Error::internal("unused"))
    }

    async fn authenticate(&self, token: &AccessToken) -> Result<User, Error> {
        if token.as_str() == ADMIN_TOKEN {
            Ok(admin())
        } else {
            Err(Error::unauthorized("invalid or expired access token"))
        }
    }

    async fn change_password(&self, _: &UserId, _: ChangePasswordRequest) -> Result<(), Error> {
        Err(Error::internal("unused"))
    }

    async fn forgot_password(&self, _: ForgotPasswordRequest) -> Result<(), Error> {
        Err(Error::internal("unused"))
    }

    async fn reset_password(&self, _: ResetPasswordRequest) -> Result<(), Error> {
        Err(Error::internal("unused"))
    }
}

#[async_trait]
impl UserService for RecordingPorts {
    async fn create_user(&self, request: CreateUserRequest) -> Result<User, Error> {
        self.record("create_user");
        let mut user = admin();
        user.email = request.email;
        user.name = request.name;
        user.role = request.role.unwrap_or_default();
        Ok(user)
    }

    async fn update_user(&self, _: &UserId, _: UpdateUserRequest) -> Result<User, Error> {
        self.record("update_user");
        Ok(admin())
    }

    async fn get_user(&self, _: &UserId) -> Result<User, Error> {
        self.record("get_user");
        Ok(admin())
    }

    async fn list_users(&self, query: &UserQuery) -> Result<UserPage, Error> {
        self.record("list_users");
        Ok(UserPage {
            items: Vec::new(),
            total: 0,
            page: query.page(),
            limit: query.limit(),
        })
    }
}

#[fixture]
fn recording() -> Arc<RecordingPorts> {
    Arc::new(RecordingPorts::default())
}

fn state_for(ports: &Arc<RecordingPorts>) -> HttpState {
    HttpState::new(ports.clone(), ports.clone())
}

fn authorised(req: test::TestRequest, token: &str) -> test::TestRequest {
    req.insert_header((AUTHORIZATION, format!("Bearer {token}")))
}

#[rstest]
#[case(json!({"email": "bad", "password": "123456", "name": "Lee"}), "email")]
#[case(json!({"email": "lee@example.com", "password": "123", "name": "Lee"}), "password")]
#[case(json!({"email": "lee@example.com", "password": "123456", "name": "L"}), "name")]
#[case(
    json!({"email": "lee@example.com", "password": "123456", "name": "Lee", "role": "guest"}),
    "role"
)]
#[case(
    json!({"email": "lee@example.com", "password": "123456", "name": "Lee", "isActive": "yes"}),
    "isActive"
)]
#[actix_web::test]
async fn rejected_create_never_reaches_the_service(
    recording: Arc<RecordingPorts>,
    #[case] body: Value,
    #[case] field: &str,
) {
    let state = state_for(&recording);
    let app =
        test::init_service(App::new().configure(|cfg| configure_with_state(cfg, state))).await;

    let req =
        authorised(test::TestRequest::post().uri("/api/v1/users"), ADMIN_TOKEN).set_json(body);
    let (status, body) = read_json(test::call_service(&app, req.to_request()).await).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(body["errors"][0]["field"], field);
    assert!(recording.calls().is_empty());
}

#[rstest]
#[actix_web::test]
async fn accepted_create_is_forwarded_without_extra_fields(recording: Arc<RecordingPorts>) {
    let state = state_for(&recording);
    let app =
        test::init_service(App::new().configure(|cfg| configure_with_state(cfg, state))).await;

    let body = json!({
        "email": "lee@example.com",
        "password": "123456",
        "name": "Lee",
        "role": "provider",
        "nickname": "ignored",
    });
    let req =
        authorised(test::TestRequest::post().uri("/api/v1/users"), ADMIN_TOKEN).set_json(body);
    let (status, body) = read_json(test::call_service(&app, req.to_request()).await).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["role"], "provider");
    assert!(body.get("nickname").is_none());
    assert_eq!(recording.calls(), vec!["create_user"]);
}

#[rstest]
#[actix_web::test]
async fn rejected_query_never_reaches_the_service(recording: Arc<RecordingPorts>) {
    let state = state_for(&recording);
    let app =
        test::init_service(App::new().configure(|cfg| configure_with_state(cfg, state))).await;

    let req = authorised(
        test::TestRequest::get().uri("/api/v1/users?page=0&limit=abc"),
        ADMIN_TOKEN,
    );
    let (status, body) = read_json(test::call_service(&app, req.to_request()).await).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["errors"],
        json!([
            {"field": "page", "message": "Page must be a positive integer"},
            {"field": "limit", "message": "Limit must be a positive integer"},
        ])
    );
    assert!(recording.calls().is_empty());
}

#[rstest]
#[actix_web::test]
async fn empty_update_is_accepted(recording: Arc<RecordingPorts>) {
    let state = state_for(&recording);
    let app =
        test::init_service(App::new().configure(|cfg| configure_with_state(cfg, state))).await;

    let uri = format!("/api/v1/users/{}", UserId::random());
    let req = authorised(test::TestRequest::patch().uri(&uri), ADMIN_TOKEN).set_json(json!({}));
    let res = test::call_service(&app, req.to_request()).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(recording.calls(), vec!["update_user"]);
}

#[rstest]
#[actix_web::test]
async fn malformed_user_id_is_not_found(recording: Arc<RecordingPorts>) {
    let state = state_for(&recording);
    let app =
        test::init_service(App::new().configure(|cfg| configure_with_state(cfg, state))).await;

    let req = authorised(test::TestRequest::get().uri("/api/v1/users/not-a-uuid"), ADMIN_TOKEN);
    let (status, body) = read_json(test::call_service(&app, req.to_request()).await).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
    assert!(recording.calls().is_empty());
}

async fn customer_session(accounts: &InMemoryAccounts) -> AuthResponse {
    accounts
        .register(RegisterRequest {
            email: "kim@example.com".to_owned(),
            password: Password::new("123456"),
            name: "Kim".to_owned(),
            phone: None,
        })
        .await
        .expect("registration succeeds")
}

#[rstest]
#[actix_web::test]
async fn customers_cannot_create_or_list_users() {
    let accounts = Arc::new(InMemoryAccounts::new());
    let session = customer_session(&accounts).await;
    let token = session.access_token.as_str().to_owned();
    let app = test::init_service(App::new().configure(|cfg| configure(cfg, accounts))).await;

    let create = authorised(test::TestRequest::post().uri("/api/v1/users"), &token)
        .set_json(json!({"email": "lee@example.com", "password": "123456", "name": "Lee"}));
    let list = authorised(test::TestRequest::get().uri("/api/v1/users"), &token);

    let create_res = test::call_service(&app, create.to_request()).await;
    let list_res = test::call_service(&app, list.to_request()).await;

    assert_eq!(create_res.status(), StatusCode::FORBIDDEN);
    assert_eq!(list_res.status(), StatusCode::FORBIDDEN);
}

#[rstest]
#[case(json!({"name": "Kim Minji"}), StatusCode::OK)]
#[case(json!({"role": "admin"}), StatusCode::FORBIDDEN)]
#[case(json!({"isActive": false}), StatusCode::FORBIDDEN)]
#[actix_web::test]
async fn customers_update_only_their_own_profile(
    #[case] body: Value,
    #[case] expected: StatusCode,
) {
    let accounts = Arc::new(InMemoryAccounts::new());
    let session = customer_session(&accounts).await;
    let token = session.access_token.as_str().to_owned();
    let uri = format!("/api/v1/users/{}", session.user.id);
    let app = test::init_service(App::new().configure(|cfg| configure(cfg, accounts))).await;

    let req = authorised(test::TestRequest::patch().uri(&uri), &token).set_json(body);
    let res = test::call_service(&app, req.to_request()).await;

    assert_eq!(res.status(), expected);
}

#[rstest]
#[actix_web::test]
async fn admins_list_users_with_pagination() {
    let accounts = Arc::new(InMemoryAccounts::new());
    accounts
        .create_user(CreateUserRequest {
            email: "admin@example.com".to_owned(),
            password: Password::new("adminpass"),
            name: "Admin".to_owned(),
            phone: None,
            role: Some(UserRole::Admin),
            is_active: None,
        })
        .await
        .expect("admin created");
    customer_session(&accounts).await;
    let session = accounts
        .login(LoginRequest {
            email: "admin@example.com".to_owned(),
            password: Password::new("adminpass"),
        })
        .await
        .expect("admin logs in");
    let token = session.access_token.as_str().to_owned();
    let app = test::init_service(App::new().configure(|cfg| configure(cfg, accounts))).await;

    let req = authorised(
        test::TestRequest::get().uri("/api/v1/users?role=customer&page=1&limit=10"),
        &token,
    );
    let (status, body) = read_json(test::call_service(&app, req.to_request()).await).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["limit"], 10);
    assert_eq!(body["items"][0]["email"], "kim@example.com");
}
