//! Authentication routes: login, logout and the current admin.

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use rewards_db::{AdminRepository, SessionRepository};
use rewards_shared::auth::{AdminInfo, LoginRequest, LoginResponse};
use rewards_shared::types::{AdminId, SessionId};
use tracing::info;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::extract::Json;
use crate::middleware::auth::{AuthAdmin, SESSION_COOKIE};

/// Shown for unknown usernames and wrong passwords alike.
const INVALID_CREDENTIALS: &str = "Invalid credentials. Please try again.";
const MISSING_CREDENTIALS: &str = "Please enter both username and password.";

/// Creates the public auth router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

/// Creates the auth routes that need a session.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
}

fn admin_info(actor: &rewards_core::auth::Actor) -> AdminInfo {
    AdminInfo {
        id: actor.admin_id.into_inner(),
        username: actor.username.clone(),
        role: actor.role.to_string(),
    }
}

/// POST /auth/login - Verify credentials, open a session and set the cookie.
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<(CookieJar, Json<LoginResponse>)> {
    if payload.username.trim().is_empty() || payload.password.trim().is_empty() {
        return Err(ApiError::validation(MISSING_CREDENTIALS));
    }

    let Some(admin) = AdminRepository::new((*state.db).clone())
        .authenticate(&payload.username, &payload.password)
        .await?
    else {
        info!(username = %payload.username.trim(), "Failed login attempt");
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    };

    let actor = admin.actor();
    let session_id = SessionId::new();
    let issued = state.jwt_service.issue_session_token(
        admin.id,
        session_id.into_inner(),
        actor.role.as_str(),
    )?;

    SessionRepository::new((*state.db).clone())
        .create(
            session_id,
            AdminId::from_uuid(admin.id),
            &issued.token,
            issued.expires_at,
        )
        .await?;

    info!(admin_id = %admin.id, session_id = %session_id, "Admin logged in");

    let cookie = Cookie::build((SESSION_COOKIE, issued.token.clone()))
        .path("/")
        .http_only(true)
        .secure(state.cookie_secure)
        .same_site(SameSite::Lax);

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            admin: admin_info(&actor),
            access_token: issued.token,
            expires_in: state.jwt_service.session_expires_in(),
        }),
    ))
}

/// POST /auth/logout - Revoke the current session and clear the cookie.
async fn logout(
    State(state): State<AppState>,
    auth: AuthAdmin,
    jar: CookieJar,
) -> ApiResult<(CookieJar, StatusCode)> {
    SessionRepository::new((*state.db).clone())
        .revoke(auth.session_id)
        .await?;

    info!(admin_id = %auth.actor.admin_id, "Admin logged out");

    Ok((
        jar.remove(Cookie::build(SESSION_COOKIE).path("/")),
        StatusCode::NO_CONTENT,
    ))
}

/// GET /auth/me - The signed-in admin.
async fn me(auth: AuthAdmin) -> Json<AdminInfo> {
    Json(admin_info(&auth.actor))
}

#[cfg(test)]
mod tests {
    use axum::http::header::{COOKIE, SET_COOKIE};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::test_support::{
        PASSWORD, call, login, read_json, request, seed_admin, send, test_state,
    };

    #[tokio::test]
    async fn test_login_sets_session_cookie() {
        let state = test_state().await;
        seed_admin(&state, "admin", "superadmin").await;

        let response = call(
            &state,
            request(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(json!({ "username": "admin", "password": PASSWORD })),
            ),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response
            .headers()
            .get(SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap()
            .to_string();
        assert!(cookie.starts_with("rewards_session="));
        assert!(cookie.contains("HttpOnly"));

        let body = read_json(response).await;
        assert_eq!(body["admin"]["username"], "admin");
        assert_eq!(body["admin"]["role"], "superadmin");
        assert!(body["access_token"].as_str().is_some_and(|t| !t.is_empty()));
    }

    #[tokio::test]
    async fn test_login_rejects_bad_credentials_with_one_message() {
        let state = test_state().await;
        seed_admin(&state, "admin", "superadmin").await;

        for (username, password) in [("admin", "wrong-password"), ("nobody", PASSWORD)] {
            let (status, body) = send(
                &state,
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(json!({ "username": username, "password": password })),
            )
            .await;

            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(
                body["error"]["message"],
                "Invalid credentials. Please try again."
            );
        }
    }

    #[tokio::test]
    async fn test_login_requires_both_fields() {
        let state = test_state().await;
        seed_admin(&state, "admin", "superadmin").await;

        for payload in [
            json!({ "username": "", "password": "" }),
            json!({ "username": "admin", "password": "   " }),
            json!({ "password": PASSWORD }),
        ] {
            let (status, body) =
                send(&state, Method::POST, "/api/v1/auth/login", None, Some(payload)).await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(
                body["error"]["message"],
                "Please enter both username and password."
            );
        }
    }

    #[tokio::test]
    async fn test_me_requires_session() {
        let state = test_state().await;
        let (status, body) = send(&state, Method::GET, "/api/v1/auth/me", None, None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_cookie_authenticates() {
        let state = test_state().await;
        seed_admin(&state, "cashier", "cashier").await;
        let token = login(&state, "cashier").await;

        let mut req = request(Method::GET, "/api/v1/auth/me", None, None);
        req.headers_mut().insert(
            COOKIE,
            format!("rewards_session={token}").parse().unwrap(),
        );
        let response = call(&state, req).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["username"], "cashier");
        assert_eq!(body["role"], "cashier");
    }

    #[tokio::test]
    async fn test_logout_revokes_session() {
        let state = test_state().await;
        seed_admin(&state, "admin", "superadmin").await;
        let token = login(&state, "admin").await;

        let (status, _) = send(&state, Method::POST, "/api/v1/auth/logout", Some(&token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&state, Method::GET, "/api/v1/auth/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_garbage_token_is_rejected() {
        let state = test_state().await;
        let (status, _) = send(
            &state,
            Method::GET,
            "/api/v1/auth/me",
            Some("not-a-jwt"),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
