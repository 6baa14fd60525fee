//! Admin account management. Superadmin only.

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, patch},
};
use chrono::{DateTime, Utc};
use rewards_core::auth::{AdminRole, Capability};
use rewards_core::directory::{AdminChanges, AdminDraft};
use rewards_db::entities::admins;
use rewards_db::AdminRepository;
use rewards_shared::types::AdminId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiResult;
use crate::extract::{Json, Path};
use crate::middleware::auth::AuthAdmin;

/// Creates the admin management router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admins", get(list_admins).post(create_admin))
        .route("/admins/{id}", patch(update_admin).delete(delete_admin))
}

/// Admin account as shown in the back office.
#[derive(Debug, Serialize)]
struct AdminResponse {
    id: Uuid,
    username: String,
    role: AdminRole,
    created_at: DateTime<Utc>,
}

impl From<admins::Model> for AdminResponse {
    fn from(model: admins::Model) -> Self {
        Self {
            role: model.role(),
            id: model.id,
            username: model.username,
            created_at: model.created_at,
        }
    }
}

/// GET /admins
async fn list_admins(
    State(state): State<AppState>,
    auth: AuthAdmin,
) -> ApiResult<Json<Vec<AdminResponse>>> {
    auth.actor.require(Capability::ManageAdmins)?;

    let admins = AdminRepository::new((*state.db).clone()).list().await?;
    Ok(Json(admins.into_iter().map(AdminResponse::from).collect()))
}

#[derive(Debug, Deserialize)]
struct CreateAdminRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    role: String,
}

/// POST /admins
async fn create_admin(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Json(payload): Json<CreateAdminRequest>,
) -> ApiResult<(StatusCode, Json<AdminResponse>)> {
    auth.actor.require(Capability::ManageAdmins)?;

    let draft = AdminDraft::validate(&payload.username, &payload.password, &payload.role)?;
    let admin = AdminRepository::new((*state.db).clone())
        .create(&draft)
        .await?;

    Ok((StatusCode::CREATED, Json(admin.into())))
}

#[derive(Debug, Deserialize)]
struct UpdateAdminRequest {
    username: Option<String>,
    password: Option<String>,
    role: Option<String>,
}

/// PATCH /admins/{id} - Partial update. A blank password keeps the current one.
async fn update_admin(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAdminRequest>,
) -> ApiResult<Json<AdminResponse>> {
    auth.actor.require(Capability::ManageAdmins)?;

    let changes = AdminChanges::validate(
        payload.username.as_deref(),
        payload.password.as_deref(),
        payload.role.as_deref(),
    )?;

    let update = AdminRepository::new((*state.db).clone())
        .update(AdminId::from_uuid(id), &changes)
        .await?;

    Ok(Json(update.admin.into()))
}

/// DELETE /admins/{id}
async fn delete_admin(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    auth.actor.require(Capability::ManageAdmins)?;

    AdminRepository::new((*state.db).clone())
        .delete(&auth.actor, AdminId::from_uuid(id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
