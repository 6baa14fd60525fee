//! Visit log routes.

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use rewards_db::{CustomerRepository, VisitRepository, VisitView};
use rewards_shared::types::CustomerId;
use serde::Deserialize;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiResult;
use crate::extract::{Json, Path, Query};
use crate::middleware::auth::AuthAdmin;

const DEFAULT_LIMIT: u64 = 10;
const MAX_LIMIT: u64 = 100;

/// Creates the visits router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/customers/{id}/visits", get(list_visits).post(log_visit))
}

#[derive(Debug, Deserialize)]
struct VisitQuery {
    limit: Option<u64>,
}

/// GET /customers/{id}/visits - Most recent visits, newest first.
async fn list_visits(
    State(state): State<AppState>,
    _auth: AuthAdmin,
    Path(id): Path<Uuid>,
    Query(query): Query<VisitQuery>,
) -> ApiResult<Json<Vec<VisitView>>> {
    let customer_id = CustomerId::from_uuid(id);
    CustomerRepository::new((*state.db).clone())
        .get(customer_id)
        .await?;

    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let visits = VisitRepository::new((*state.db).clone())
        .recent(customer_id, limit)
        .await?;

    Ok(Json(visits))
}

/// POST /customers/{id}/visits - Log a visit (superadmin).
async fn log_visit(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Path(id): Path<Uuid>,
) -> ApiResult<(StatusCode, Json<VisitView>)> {
    let visit = VisitRepository::new((*state.db).clone())
        .log_visit(&auth.actor, CustomerId::from_uuid(id))
        .await?;

    Ok((StatusCode::CREATED, Json(visit)))
}
