//! Fixtures for route tests: an in-memory database, seeded accounts and a
//! request helper that goes through the full router.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response, StatusCode};
use http_body_util::BodyExt;
use rewards_core::directory::{AdminDraft, CustomerDraft};
use rewards_db::entities::{admins, customers};
use rewards_db::migration::{Migrator, MigratorTrait};
use rewards_db::{AdminRepository, CustomerRepository};
use rewards_shared::{JwtConfig, JwtService};
use sea_orm::{ConnectOptions, Database};
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::{AppState, create_router};

pub const PASSWORD: &str = "password123";

pub async fn test_state() -> AppState {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None).await.expect("Failed to run migrations");

    AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(JwtService::new(JwtConfig {
            secret: "route-test-secret".to_string(),
            session_expires_secs: 3600,
        })),
        cookie_secure: false,
        request_timeout: Duration::from_secs(30),
    }
}

pub async fn seed_admin(state: &AppState, username: &str, role: &str) -> admins::Model {
    let draft = AdminDraft::validate(username, PASSWORD, role).expect("valid admin");
    AdminRepository::new((*state.db).clone())
        .create(&draft)
        .await
        .expect("Failed to create admin")
}

pub async fn seed_customer(state: &AppState, phone: &str, name: &str) -> customers::Model {
    let draft = CustomerDraft::validate(phone, name, None).expect("valid customer");
    CustomerRepository::new((*state.db).clone())
        .create(&draft)
        .await
        .expect("Failed to create customer")
}

pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn call(state: &AppState, request: Request<Body>) -> Response<Body> {
    create_router(state.clone()).oneshot(request).await.unwrap()
}

pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    }
}

/// Sends a request through the full router and decodes the JSON body.
pub async fn send(
    state: &AppState,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let response = call(state, request(method, uri, token, body)).await;
    let status = response.status();
    (status, read_json(response).await)
}

/// Logs in with the fixture password and returns the session token.
pub async fn login(state: &AppState, username: &str) -> String {
    let (status, body) = send(
        state,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "username": username, "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["access_token"].as_str().unwrap().to_string()
}

/// Seeds a superadmin named `admin` and returns its token.
pub async fn superadmin_token(state: &AppState) -> String {
    seed_admin(state, "admin", "superadmin").await;
    login(state, "admin").await
}

/// Seeds a cashier named `cashier` and returns its token.
pub async fn cashier_token(state: &AppState) -> String {
    seed_admin(state, "cashier", "cashier").await;
    login(state, "cashier").await
}
