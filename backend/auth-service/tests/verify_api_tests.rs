//! HTTP-level tests for the verify endpoint.

use std::sync::Arc;

use actix_web::{test, web, App};
use auth_middleware::{Claims, Role};
use auth_service::{
    config::Config,
    handlers,
    models::User,
    store::{MemoryUserStore, UserStore},
    AppState,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};

const SECRET: &str = "test-secret";

fn issue_token(user: &User, expires_in: Duration) -> String {
    let now = Utc::now();
    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role,
        iat: now.timestamp(),
        exp: (now + expires_in).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

async fn state_with(users: Vec<User>) -> web::Data<AppState> {
    let store = MemoryUserStore::default();
    for user in users {
        store.insert(user).await;
    }

    web::Data::new(AppState {
        config: Config {
            port: 0,
            jwt_secret: SECRET.to_string(),
        },
        users: Arc::new(store),
    })
}

macro_rules! verify_app {
    ($users:expr) => {
        test::init_service(
            App::new()
                .app_data(state_with($users).await)
                .route("/health", web::get().to(handlers::health))
                .configure(handlers::register_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn valid_token_returns_identity_with_account_state() {
    let user = User::new("user@example.com", Role::User);
    let token = issue_token(&user, Duration::hours(24));
    let app = verify_app!(vec![user.clone()]);

    let req = test::TestRequest::get()
        .uri("/api/auth/verify")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["message"], "Token verified successfully");
    assert_eq!(body["user"]["id"], user.id.to_string());
    assert_eq!(body["user"]["email"], "user@example.com");
    assert_eq!(body["user"]["active"], true);
}

#[actix_web::test]
async fn missing_header_is_401_no_token_provided() {
    let app = verify_app!(vec![]);

    let req = test::TestRequest::get().uri("/api/auth/verify").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 401);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "No token provided");
}

#[actix_web::test]
async fn expired_token_is_401_token_expired() {
    let user = User::new("user@example.com", Role::User);
    let token = issue_token(&user, Duration::hours(-1));
    let app = verify_app!(vec![user]);

    let req = test::TestRequest::get()
        .uri("/api/auth/verify")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 401);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Token expired");
}

#[actix_web::test]
async fn tampered_token_is_401_invalid_token() {
    let user = User::new("user@example.com", Role::User);
    let mut token = issue_token(&user, Duration::hours(1));
    token.push('x');
    let app = verify_app!(vec![user]);

    let req = test::TestRequest::get()
        .uri("/api/auth/verify")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 401);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid token");
}

#[actix_web::test]
async fn unknown_subject_is_rejected() {
    let ghost = User::new("ghost@example.com", Role::User);
    let token = issue_token(&ghost, Duration::hours(1));
    // Store does not contain the subject.
    let app = verify_app!(vec![]);

    let req = test::TestRequest::get()
        .uri("/api/auth/verify")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn deactivated_account_is_rejected_despite_valid_signature() {
    let mut user = User::new("user@example.com", Role::Admin);
    user.is_active = false;
    let token = issue_token(&user, Duration::hours(1));
    let app = verify_app!(vec![user]);

    let req = test::TestRequest::get()
        .uri("/api/auth/verify")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 401);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid token");
}

#[actix_web::test]
async fn health_reports_service_name() {
    let app = verify_app!(vec![]);

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "OK");
    assert_eq!(body["service"], "Auth Service");
}
