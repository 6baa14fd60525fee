//! Session authentication for back-office routes.
//!
//! A request is authenticated by a session token carried either in
//! `Authorization: Bearer <token>` or in the `rewards_session` cookie. The
//! token must verify, its session row must be unrevoked and unexpired, and
//! the admin must still exist. The admin is reloaded on every request so role
//! changes and deletions take effect immediately.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use rewards_core::auth::Actor;
use rewards_db::{AdminRepository, SessionRepository};
use rewards_shared::JwtError;
use rewards_shared::types::{AdminId, SessionId};

use crate::AppState;
use crate::error::ApiError;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "rewards_session";

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

/// Finds the session token in the request, header first.
fn session_token(request: &Request) -> Option<String> {
    let from_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(extract_bearer_token)
        .map(str::to_string);

    from_header.or_else(|| {
        CookieJar::from_headers(request.headers())
            .get(SESSION_COOKIE)
            .map(|c| c.value().to_string())
    })
}

/// The authenticated admin behind a request.
#[derive(Debug, Clone)]
pub struct AuthAdmin {
    /// Actor passed into every mutating call.
    pub actor: Actor,
    /// Session the request was made with.
    pub session_id: SessionId,
}

async fn authenticate(state: &AppState, token: &str) -> Result<AuthAdmin, ApiError> {
    let claims = state.jwt_service.validate_token(token).map_err(|e| match e {
        JwtError::Expired => ApiError::unauthorized("Your session has expired. Please log in again."),
        _ => ApiError::unauthorized("Invalid session token."),
    })?;

    let session = SessionRepository::new((*state.db).clone())
        .find_active_by_token(token)
        .await?
        .filter(|s| s.id == claims.session_id() && s.admin_id == claims.admin_id())
        .ok_or_else(|| ApiError::unauthorized("Your session has ended. Please log in again."))?;

    let admin = AdminRepository::new((*state.db).clone())
        .find_by_id(AdminId::from_uuid(session.admin_id))
        .await?
        .ok_or_else(|| ApiError::unauthorized("Your session has ended. Please log in again."))?;

    Ok(AuthAdmin {
        actor: admin.actor(),
        session_id: SessionId::from_uuid(session.id),
    })
}

/// Authentication middleware for protected routes.
///
/// On success the `AuthAdmin` is stored in request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = session_token(&request) else {
        return ApiError::unauthorized("Please log in to continue.").into_response();
    };

    match authenticate(&state, &token).await {
        Ok(admin) => {
            request.extensions_mut().insert(admin);
            next.run(request).await
        }
        Err(err) => {
            tracing::debug!(error = ?err, "Rejected session");
            err.into_response()
        }
    }
}

impl<S> FromRequestParts<S> for AuthAdmin
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Please log in to continue."))
    }
}
