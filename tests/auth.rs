use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{http::header, test, web, App};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use taskboard::auth::{AuthMiddleware, AuthResponse};
use taskboard::routes::{self, health};
use taskboard::store::{MemStore, TaskStore, UserStore};

const TEST_JWT_SECRET: &str = "taskboard-test-secret";

fn test_env() {
    std::env::set_var("JWT_SECRET", TEST_JWT_SECRET);
}

fn store_data(store: &Arc<MemStore>) -> (web::Data<dyn TaskStore>, web::Data<dyn UserStore>) {
    (
        web::Data::from(store.clone() as Arc<dyn TaskStore>),
        web::Data::from(store.clone() as Arc<dyn UserStore>),
    )
}

macro_rules! init_app {
    ($store:expr) => {{
        let (task_store, user_store) = store_data($store);
        test::init_service(
            App::new()
                .app_data(task_store)
                .app_data(user_store)
                .wrap(
                    Cors::default()
                        .allow_any_origin()
                        .allow_any_method()
                        .allow_any_header()
                        .max_age(3600),
                )
                .wrap(Logger::default())
                .service(health::health)
                .service(
                    web::scope("/api")
                        .wrap(AuthMiddleware)
                        .configure(routes::config),
                ),
        )
        .await
    }};
}

#[actix_rt::test]
async fn test_register_and_login_flow() {
    test_env();
    let store = Arc::new(MemStore::new());
    let app = init_app!(&store);

    // Register a new user
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(&json!({
            "username": "integration_user",
            "email": "integration@example.com",
            "password": "Password123!"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);
    let registered: AuthResponse = test::read_body_json(resp).await;
    assert!(!registered.token.is_empty());

    // Login with the same credentials
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(&json!({
            "email": "integration@example.com",
            "password": "Password123!"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::OK);
    let logged_in: AuthResponse = test::read_body_json(resp).await;
    assert_eq!(logged_in.user_id, registered.user_id);

    // The issued token opens the protected namespace
    let req = test::TestRequest::get()
        .uri("/api/tasks")
        .append_header((header::AUTHORIZATION, format!("Bearer {}", logged_in.token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::OK);
}

#[actix_rt::test]
async fn test_register_wire_shape_is_camel_case() {
    test_env();
    let store = Arc::new(MemStore::new());
    let app = init_app!(&store);

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(&json!({
            "username": "wire_user",
            "email": "wire@example.com",
            "password": "Password123!"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["token"].is_string());
    assert!(body["userId"].is_number());
}

#[actix_rt::test]
async fn test_register_duplicate_email() {
    test_env();
    let store = Arc::new(MemStore::new());
    let app = init_app!(&store);

    let payload = json!({
        "username": "dupe_user",
        "email": "dupe@example.com",
        "password": "Password123!"
    });

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Email already registered");
}

#[actix_rt::test]
async fn test_register_field_rules() {
    test_env();
    let store = Arc::new(MemStore::new());
    let app = init_app!(&store);

    // Invalid email
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(&json!({
            "username": "valid_name",
            "email": "not-an-email",
            "password": "Password123!"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(
        resp.status(),
        actix_web::http::StatusCode::UNPROCESSABLE_ENTITY
    );

    // Password too short
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(&json!({
            "username": "valid_name",
            "email": "short@example.com",
            "password": "tiny"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(
        resp.status(),
        actix_web::http::StatusCode::UNPROCESSABLE_ENTITY
    );

    // Username with forbidden characters
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(&json!({
            "username": "bad name!",
            "email": "badname@example.com",
            "password": "Password123!"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(
        resp.status(),
        actix_web::http::StatusCode::UNPROCESSABLE_ENTITY
    );
}

#[actix_rt::test]
async fn test_login_invalid_credentials_are_indistinguishable() {
    test_env();
    let store = Arc::new(MemStore::new());
    let app = init_app!(&store);

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(&json!({
            "username": "real_user",
            "email": "real@example.com",
            "password": "Password123!"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);

    // Unknown email
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(&json!({
            "email": "nobody@example.com",
            "password": "Password123!"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);
    let unknown_email_body: Value = test::read_body_json(resp).await;

    // Wrong password for a real account
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(&json!({
            "email": "real@example.com",
            "password": "WrongPassword1!"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);
    let wrong_password_body: Value = test::read_body_json(resp).await;

    // Same body either way, so accounts cannot be probed
    assert_eq!(unknown_email_body, wrong_password_body);
    assert_eq!(unknown_email_body["message"], "Invalid credentials");
}
