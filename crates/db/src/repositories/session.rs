//! Session repository for back-office logins.

use chrono::{DateTime, Utc};
use rewards_shared::types::{AdminId, SessionId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, Set,
};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::entities::sessions;

/// Session repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    db: DatabaseConnection,
}

impl SessionRepository {
    /// Creates a new session repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Hashes a session token for storage.
    #[must_use]
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Records a freshly issued token.
    ///
    /// The ID is chosen by the caller because it is embedded in the token.
    pub async fn create(
        &self,
        id: SessionId,
        admin_id: AdminId,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<sessions::Model, DbErr> {
        sessions::ActiveModel {
            id: Set(id.into_inner()),
            admin_id: Set(admin_id.into_inner()),
            token_hash: Set(Self::hash_token(token)),
            expires_at: Set(expires_at),
            revoked_at: Set(None),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await
    }

    /// Finds the unrevoked, unexpired session for a token.
    pub async fn find_active_by_token(&self, token: &str) -> Result<Option<sessions::Model>, DbErr> {
        sessions::Entity::find()
            .filter(sessions::Column::TokenHash.eq(Self::hash_token(token)))
            .filter(sessions::Column::RevokedAt.is_null())
            .filter(sessions::Column::ExpiresAt.gt(Utc::now()))
            .one(&self.db)
            .await
    }

    /// Revokes a session. Returns false if it was unknown or already revoked.
    pub async fn revoke(&self, id: SessionId) -> Result<bool, DbErr> {
        let result = sessions::Entity::update_many()
            .col_expr(
                sessions::Column::RevokedAt,
                sea_orm::sea_query::Expr::value(Utc::now()),
            )
            .filter(sessions::Column::Id.eq(id.into_inner()))
            .filter(sessions::Column::RevokedAt.is_null())
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Counts active sessions for an admin.
    pub async fn count_active(&self, admin_id: AdminId) -> Result<u64, DbErr> {
        sessions::Entity::find()
            .filter(sessions::Column::AdminId.eq(admin_id.into_inner()))
            .filter(sessions::Column::RevokedAt.is_null())
            .filter(sessions::Column::ExpiresAt.gt(Utc::now()))
            .count(&self.db)
            .await
    }

    /// Deletes expired sessions (for maintenance).
    pub async fn cleanup_expired(&self) -> Result<u64, DbErr> {
        let result = sessions::Entity::delete_many()
            .filter(sessions::Column::ExpiresAt.lt(Utc::now()))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }
}

/// Revokes every open session of an admin.
pub(crate) async fn revoke_admin_sessions<C: ConnectionTrait>(
    conn: &C,
    admin_id: Uuid,
) -> Result<u64, DbErr> {
    let result = sessions::Entity::update_many()
        .col_expr(
            sessions::Column::RevokedAt,
            sea_orm::sea_query::Expr::value(Utc::now()),
        )
        .filter(sessions::Column::AdminId.eq(admin_id))
        .filter(sessions::Column::RevokedAt.is_null())
        .exec(conn)
        .await?;

    Ok(result.rows_affected)
}
