//! Points routes. Every change goes through the ledger policy.

use axum::{
    Router,
    extract::State,
    routing::{post, put},
};
use rewards_core::ledger::{PointsAction, RewardProgress};
use rewards_db::{LedgerRepository, TransactionView};
use rewards_shared::types::CustomerId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiResult;
use crate::extract::{Json, Path};
use crate::middleware::auth::AuthAdmin;

/// Creates the points router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/customers/{id}/points/add", post(add_points))
        .route("/customers/{id}/points/subtract", post(subtract_points))
        .route("/customers/{id}/points/redeem", post(redeem_reward))
        .route("/customers/{id}/points/balance", put(set_balance))
}

/// A missing amount reads as zero and is rejected by the policy.
#[derive(Debug, Deserialize)]
struct AmountRequest {
    #[serde(default)]
    amount: i64,
}

#[derive(Debug, Deserialize)]
struct SetBalanceRequest {
    balance: i64,
}

/// Response for every accepted points action.
#[derive(Debug, Serialize)]
struct PointsResponse {
    message: String,
    balance: i64,
    entry: TransactionView,
    progress: RewardProgress,
}

async fn apply(
    state: &AppState,
    auth: &AuthAdmin,
    id: Uuid,
    action: PointsAction,
) -> ApiResult<Json<PointsResponse>> {
    let applied = LedgerRepository::new((*state.db).clone())
        .apply(&auth.actor, CustomerId::from_uuid(id), action)
        .await?;

    Ok(Json(PointsResponse {
        progress: RewardProgress::from_balance(applied.balance),
        message: applied.message,
        balance: applied.balance,
        entry: applied.entry,
    }))
}

/// POST /customers/{id}/points/add
async fn add_points(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Path(id): Path<Uuid>,
    Json(payload): Json<AmountRequest>,
) -> ApiResult<Json<PointsResponse>> {
    apply(&state, &auth, id, PointsAction::Add(payload.amount)).await
}

/// POST /customers/{id}/points/subtract
async fn subtract_points(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Path(id): Path<Uuid>,
    Json(payload): Json<AmountRequest>,
) -> ApiResult<Json<PointsResponse>> {
    apply(&state, &auth, id, PointsAction::Subtract(payload.amount)).await
}

/// POST /customers/{id}/points/redeem - Trade one reward's worth of points.
async fn redeem_reward(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<PointsResponse>> {
    apply(&state, &auth, id, PointsAction::Redeem).await
}

/// PUT /customers/{id}/points/balance - Correct the balance (superadmin).
async fn set_balance(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetBalanceRequest>,
) -> ApiResult<Json<PointsResponse>> {
    apply(&state, &auth, id, PointsAction::SetBalance(payload.balance)).await
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::{Value, json};
    use uuid::Uuid;

    use crate::AppState;
    use crate::test_support::{cashier_token, seed_customer, send, superadmin_token, test_state};

    async fn post_points(
        state: &AppState,
        token: &str,
        customer: Uuid,
        action: &str,
        body: Value,
    ) -> (StatusCode, Value) {
        send(
            state,
            Method::POST,
            &format!("/api/v1/customers/{customer}/points/{action}"),
            Some(token),
            Some(body),
        )
        .await
    }

    async fn set_balance(
        state: &AppState,
        token: &str,
        customer: Uuid,
        balance: i64,
    ) -> (StatusCode, Value) {
        send(
            state,
            Method::PUT,
            &format!("/api/v1/customers/{customer}/points/balance"),
            Some(token),
            Some(json!({ "balance": balance })),
        )
        .await
    }

    #[tokio::test]
    async fn test_cashier_add_redeem_subtract() {
        let state = test_state().await;
        let token = cashier_token(&state).await;
        let customer = seed_customer(&state, "5551234567", "Jane").await.id;

        let (status, body) = post_points(&state, &token, customer, "add", json!({ "amount": 250 })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Added 250 points.");
        assert_eq!(body["balance"], 250);
        assert_eq!(body["entry"]["points"], 250);
        assert_eq!(body["entry"]["handled_by"], "cashier");
        assert_eq!(body["progress"]["can_redeem"], true);

        let (status, body) = post_points(&state, &token, customer, "redeem", json!({})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Redeemed 200 points for $5 reward.");
        assert_eq!(body["balance"], 50);
        assert_eq!(body["entry"]["points"], -200);

        let (status, body) = post_points(&state, &token, customer, "subtract", json!({ "amount": 20 })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["balance"], 30);
    }

    #[tokio::test]
    async fn test_rejections_leave_balance_alone() {
        let state = test_state().await;
        let token = cashier_token(&state).await;
        let customer = seed_customer(&state, "5551234567", "Jane").await.id;
        post_points(&state, &token, customer, "add", json!({ "amount": 50 })).await;

        let (status, body) = post_points(&state, &token, customer, "subtract", json!({ "amount": 100 })).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["message"], "Cannot reduce below zero points.");

        let (status, body) = post_points(&state, &token, customer, "redeem", json!({})).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body["error"]["message"],
            "Customer does not have enough points to redeem."
        );

        let (status, body) = post_points(&state, &token, customer, "add", json!({ "amount": 0 })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Enter a positive number of points to add.");

        let (status, _) = post_points(&state, &token, customer, "subtract", json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = post_points(&state, &token, customer, "add", json!({ "amount": 1 })).await;
        assert_eq!(body["balance"], 51);
    }

    #[tokio::test]
    async fn test_cashier_cannot_edit_balance() {
        let state = test_state().await;
        let token = cashier_token(&state).await;
        let customer = seed_customer(&state, "5551234567", "Jane").await.id;

        let (status, body) = set_balance(&state, &token, customer, 500).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(
            body["error"]["message"],
            "You do not have permission to edit points."
        );
    }

    #[tokio::test]
    async fn test_superadmin_sets_balance_once() {
        let state = test_state().await;
        let token = superadmin_token(&state).await;
        let customer = seed_customer(&state, "5551234567", "Jane").await.id;

        let (status, body) = set_balance(&state, &token, customer, 80).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Adjusted balance to 80 points.");
        assert_eq!(body["balance"], 80);
        assert_eq!(body["entry"]["points"], 80);

        let (status, body) = set_balance(&state, &token, customer, 80).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body["error"]["message"],
            "The balance is already set to that value."
        );

        let (status, _) = set_balance(&state, &token, customer, -5).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = set_balance(&state, &token, customer, 30).await;
        assert_eq!(body["entry"]["points"], -50);
        assert_eq!(body["balance"], 30);
    }

    #[tokio::test]
    async fn test_unknown_customer() {
        let state = test_state().await;
        let token = superadmin_token(&state).await;

        let (status, body) = post_points(&state, &token, Uuid::new_v4(), "add", json!({ "amount": 5 })).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["message"], "Customer not found.");
    }

    #[tokio::test]
    async fn test_malformed_body_is_validation_error() {
        let state = test_state().await;
        let token = cashier_token(&state).await;
        let customer = seed_customer(&state, "5551234567", "Jane").await.id;

        let (status, body) = post_points(&state, &token, customer, "add", json!({ "amount": "ten" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let (status, body) = send(
            &state,
            Method::PUT,
            &format!("/api/v1/customers/{customer}/points/balance"),
            Some(&token),
            Some(json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["message"].as_str().unwrap().contains("balance"));

        let (status, body) = send(
            &state,
            Method::POST,
            "/api/v1/customers/not-a-uuid/points/redeem",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_requires_session() {
        let state = test_state().await;
        let customer = seed_customer(&state, "5551234567", "Jane").await.id;

        let (status, _) = send(
            &state,
            Method::POST,
            &format!("/api/v1/customers/{customer}/points/add"),
            None,
            Some(json!({ "amount": 5 })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
