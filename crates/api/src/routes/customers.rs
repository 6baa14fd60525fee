//! Customer directory routes for the back office.

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use rewards_core::auth::Capability;
use rewards_core::directory::{CustomerDraft, SearchTerm};
use rewards_core::ledger::RewardProgress;
use rewards_db::entities::customers;
use rewards_db::{
    CustomerRepository, LedgerRepository, TransactionView, VisitRepository, VisitView,
};
use rewards_shared::types::{CustomerId, PageRequest, PageResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::kiosk::CustomerCard;
use crate::AppState;
use crate::error::ApiResult;
use crate::extract::{Json, Path, Query};
use crate::middleware::auth::AuthAdmin;

/// Entries shown on a customer profile.
const PROFILE_RECENT_TRANSACTIONS: u64 = 5;
const PROFILE_RECENT_VISITS: u64 = 10;

/// Creates the customer router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/customers", get(list_customers).post(create_customer))
        .route("/customers/lookup", get(lookup_customer))
        .route(
            "/customers/{id}",
            get(get_customer)
                .patch(update_customer)
                .delete(delete_customer),
        )
        .route("/customers/{id}/transactions", get(list_transactions))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    page: Option<u32>,
    per_page: Option<u32>,
    search: Option<String>,
}

/// A customer row in the list view.
#[derive(Debug, Serialize)]
struct CustomerRow {
    #[serde(flatten)]
    customer: customers::Model,
    balance: i64,
}

/// GET /customers - Paginated customer list, newest first.
async fn list_customers(
    State(state): State<AppState>,
    _auth: AuthAdmin,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<PageResponse<CustomerRow>>> {
    let defaults = PageRequest::default();
    let page = PageRequest {
        page: query.page.unwrap_or(defaults.page),
        per_page: query.per_page.unwrap_or(defaults.per_page),
    }
    .clamped();
    let search = query.search.as_deref().and_then(SearchTerm::parse);

    let (items, total) = CustomerRepository::new((*state.db).clone())
        .list(&page, search.as_ref())
        .await?;

    let ledger = LedgerRepository::new((*state.db).clone());
    let mut rows = Vec::with_capacity(items.len());
    for customer in items {
        let balance = ledger.balance(CustomerId::from_uuid(customer.id)).await?;
        rows.push(CustomerRow { customer, balance });
    }

    Ok(Json(PageResponse::new(rows, page.page, page.per_page, total)))
}

#[derive(Debug, Deserialize)]
struct LookupQuery {
    #[serde(default)]
    q: String,
}

#[derive(Debug, Serialize)]
struct LookupResponse {
    /// Best match, or `None` when nothing matched or the term was blank.
    result: Option<CustomerCard>,
}

/// GET /customers/lookup?q= - Find the newest customer matching phone or name.
async fn lookup_customer(
    State(state): State<AppState>,
    _auth: AuthAdmin,
    Query(query): Query<LookupQuery>,
) -> ApiResult<Json<LookupResponse>> {
    let Some(term) = SearchTerm::parse(&query.q) else {
        return Ok(Json(LookupResponse { result: None }));
    };

    let Some(customer) = CustomerRepository::new((*state.db).clone())
        .search_one(&term)
        .await?
    else {
        return Ok(Json(LookupResponse { result: None }));
    };

    let balance = LedgerRepository::new((*state.db).clone())
        .balance(CustomerId::from_uuid(customer.id))
        .await?;

    Ok(Json(LookupResponse {
        result: Some(CustomerCard {
            customer,
            balance,
            progress: RewardProgress::from_balance(balance),
        }),
    }))
}

#[derive(Debug, Serialize)]
struct CustomerProfile {
    customer: customers::Model,
    balance: i64,
    progress: RewardProgress,
    recent_transactions: Vec<TransactionView>,
    recent_visits: Vec<VisitView>,
}

/// GET /customers/{id} - Profile with balance and recent activity.
async fn get_customer(
    State(state): State<AppState>,
    _auth: AuthAdmin,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<CustomerProfile>> {
    let customer_id = CustomerId::from_uuid(id);
    let customer = CustomerRepository::new((*state.db).clone())
        .get(customer_id)
        .await?;

    let ledger = LedgerRepository::new((*state.db).clone());
    let balance = ledger.balance(customer_id).await?;
    let recent_transactions = ledger
        .recent(customer_id, PROFILE_RECENT_TRANSACTIONS)
        .await?;
    let recent_visits = VisitRepository::new((*state.db).clone())
        .recent(customer_id, PROFILE_RECENT_VISITS)
        .await?;

    Ok(Json(CustomerProfile {
        customer,
        balance,
        progress: RewardProgress::from_balance(balance),
        recent_transactions,
        recent_visits,
    }))
}

/// GET /customers/{id}/transactions - Full ledger history, paginated.
async fn list_transactions(
    State(state): State<AppState>,
    _auth: AuthAdmin,
    Path(id): Path<Uuid>,
    Query(page): Query<PageRequest>,
) -> ApiResult<Json<PageResponse<TransactionView>>> {
    let customer_id = CustomerId::from_uuid(id);
    CustomerRepository::new((*state.db).clone())
        .get(customer_id)
        .await?;

    let page = page.clamped();
    let (items, total) = LedgerRepository::new((*state.db).clone())
        .history(customer_id, &page)
        .await?;

    Ok(Json(PageResponse::new(items, page.page, page.per_page, total)))
}

#[derive(Debug, Deserialize)]
struct CreateCustomerRequest {
    #[serde(default)]
    phone: String,
    #[serde(default)]
    name: String,
    email: Option<String>,
}

/// POST /customers - Create a customer (superadmin).
async fn create_customer(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Json(payload): Json<CreateCustomerRequest>,
) -> ApiResult<(StatusCode, Json<customers::Model>)> {
    auth.actor.require(Capability::ManageCustomers)?;

    let draft = CustomerDraft::validate(&payload.phone, &payload.name, payload.email.as_deref())?;
    let customer = CustomerRepository::new((*state.db).clone())
        .create(&draft)
        .await?;

    Ok((StatusCode::CREATED, Json(customer)))
}

/// Omitted fields keep their current value; an empty `email` clears it.
#[derive(Debug, Deserialize)]
struct UpdateCustomerRequest {
    phone: Option<String>,
    name: Option<String>,
    email: Option<String>,
}

/// PATCH /customers/{id} - Edit a customer (superadmin).
async fn update_customer(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCustomerRequest>,
) -> ApiResult<Json<customers::Model>> {
    auth.actor.require(Capability::ManageCustomers)?;

    let customer_id = CustomerId::from_uuid(id);
    let repo = CustomerRepository::new((*state.db).clone());
    let existing = repo.get(customer_id).await?;

    let draft = CustomerDraft::validate(
        payload.phone.as_deref().unwrap_or(&existing.phone),
        payload.name.as_deref().unwrap_or(&existing.name),
        payload.email.as_deref().or(existing.email.as_deref()),
    )?;

    let updated = repo.update(customer_id, &draft).await?;
    tracing::info!(customer_id = %id, admin_id = %auth.actor.admin_id, "Customer updated");
    Ok(Json(updated))
}

/// DELETE /customers/{id} - Delete a customer and their history (superadmin).
async fn delete_customer(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    auth.actor.require(Capability::ManageCustomers)?;

    CustomerRepository::new((*state.db).clone())
        .delete(CustomerId::from_uuid(id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
