//! Admin account repository.

use rewards_core::auth::{Actor, PasswordError, hash_password, verify_password};
use rewards_core::directory::{AdminChanges, AdminDraft};
use rewards_shared::AppError;
use rewards_shared::types::AdminId;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use thiserror::Error;

use super::is_unique_violation;
use super::session::revoke_admin_sessions;
use crate::entities::admins;

/// Errors from admin account operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Admin not found.
    #[error("Admin not found.")]
    NotFound,

    /// Username already taken.
    #[error("That username is already taken.")]
    DuplicateUsername,

    /// An admin tried to delete the account they are signed in with.
    #[error("Cannot delete your own account.")]
    CannotDeleteSelf,

    /// Password hashing failed.
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<AdminError> for AppError {
    fn from(err: AdminError) -> Self {
        match err {
            AdminError::NotFound => Self::NotFound(err.to_string()),
            AdminError::DuplicateUsername => Self::Conflict(err.to_string()),
            AdminError::CannotDeleteSelf => Self::BusinessRule(err.to_string()),
            AdminError::Password(e) => e.into(),
            AdminError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

fn map_write_error(err: DbErr) -> AdminError {
    if is_unique_violation(&err) {
        AdminError::DuplicateUsername
    } else {
        AdminError::Database(err)
    }
}

/// Result of [`AdminRepository::update`].
#[derive(Debug, Clone)]
pub struct AdminUpdate {
    /// The admin after the update.
    pub admin: admins::Model,
    /// Open sessions revoked by a password or role change.
    pub sessions_revoked: u64,
}

/// Admin repository for CRUD and credential checks.
#[derive(Debug, Clone)]
pub struct AdminRepository {
    db: DatabaseConnection,
}

impl AdminRepository {
    /// Creates a new admin repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds an admin by ID.
    pub async fn find_by_id(&self, id: AdminId) -> Result<Option<admins::Model>, DbErr> {
        admins::Entity::find_by_id(id.into_inner()).one(&self.db).await
    }

    /// Finds an admin by exact username.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<admins::Model>, DbErr> {
        admins::Entity::find()
            .filter(admins::Column::Username.eq(username))
            .one(&self.db)
            .await
    }

    /// Returns the admin if `password` matches the stored hash.
    ///
    /// Unknown usernames and wrong passwords both yield `None`.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<admins::Model>, AdminError> {
        let Some(admin) = self.find_by_username(username.trim()).await? else {
            return Ok(None);
        };

        if verify_password(password, &admin.password_hash)? {
            Ok(Some(admin))
        } else {
            Ok(None)
        }
    }

    /// Lists all admins by username.
    pub async fn list(&self) -> Result<Vec<admins::Model>, DbErr> {
        admins::Entity::find()
            .order_by_asc(admins::Column::Username)
            .all(&self.db)
            .await
    }

    /// Creates an admin account.
    pub async fn create(&self, draft: &AdminDraft) -> Result<admins::Model, AdminError> {
        if self.find_by_username(&draft.username).await?.is_some() {
            return Err(AdminError::DuplicateUsername);
        }

        let admin = admins::ActiveModel {
            id: Set(AdminId::new().into_inner()),
            username: Set(draft.username.clone()),
            password_hash: Set(hash_password(&draft.password)?),
            role: Set(draft.role.as_str().to_string()),
            created_at: Set(chrono::Utc::now()),
        };

        let model = admin.insert(&self.db).await.map_err(map_write_error)?;
        tracing::info!(admin_id = %model.id, role = %model.role, "Admin created");
        Ok(model)
    }

    /// Applies a partial update.
    ///
    /// A new password or a different role revokes the admin's open sessions
    /// in the same transaction.
    pub async fn update(
        &self,
        id: AdminId,
        changes: &AdminChanges,
    ) -> Result<AdminUpdate, AdminError> {
        let txn = self.db.begin().await?;

        let Some(existing) = admins::Entity::find_by_id(id.into_inner()).one(&txn).await? else {
            txn.rollback().await?;
            return Err(AdminError::NotFound);
        };
        if changes.is_empty() {
            txn.rollback().await?;
            return Ok(AdminUpdate {
                admin: existing,
                sessions_revoked: 0,
            });
        }

        if let Some(username) = &changes.username
            && let Some(other) = admins::Entity::find()
                .filter(admins::Column::Username.eq(username))
                .one(&txn)
                .await?
            && other.id != existing.id
        {
            txn.rollback().await?;
            return Err(AdminError::DuplicateUsername);
        }

        let role_changed = changes.role.is_some_and(|role| role != existing.role());
        let mut active = existing.into_active_model();
        if let Some(username) = &changes.username {
            active.username = Set(username.clone());
        }
        if let Some(password) = &changes.password {
            active.password_hash = Set(hash_password(password)?);
        }
        if let Some(role) = changes.role {
            active.role = Set(role.as_str().to_string());
        }

        let admin = active.update(&txn).await.map_err(map_write_error)?;
        let sessions_revoked = if changes.password.is_some() || role_changed {
            revoke_admin_sessions(&txn, admin.id).await?
        } else {
            0
        };

        txn.commit().await?;

        if sessions_revoked > 0 {
            tracing::info!(
                admin_id = %admin.id,
                sessions_revoked,
                "Admin sessions revoked after update"
            );
        }
        Ok(AdminUpdate {
            admin,
            sessions_revoked,
        })
    }

    /// Deletes an admin. Their sessions go with them; their ledger entries
    /// and visits stay, attributed to nobody.
    pub async fn delete(&self, actor: &Actor, id: AdminId) -> Result<(), AdminError> {
        if actor.admin_id == id {
            return Err(AdminError::CannotDeleteSelf);
        }

        let result = admins::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AdminError::NotFound);
        }
        tracing::info!(admin_id = %id, deleted_by = %actor.admin_id, "Admin deleted");
        Ok(())
    }
}
