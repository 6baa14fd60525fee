//! Dashboard routes.

use axum::{Json, Router, extract::State, routing::get};
use rewards_core::ledger::LedgerSummary;
use rewards_db::LedgerRepository;

use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::auth::AuthAdmin;

/// Creates the dashboard router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/dashboard/summary", get(get_summary))
}

/// GET /dashboard/summary - Program-wide totals.
async fn get_summary(
    State(state): State<AppState>,
    _auth: AuthAdmin,
) -> ApiResult<Json<LedgerSummary>> {
    let summary = LedgerRepository::new((*state.db).clone())
        .summary()
        .await?;

    Ok(Json(summary))
}
