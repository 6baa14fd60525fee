//! Visit log repository.

use chrono::{DateTime, Utc};
use rewards_core::auth::{Actor, Capability, PermissionDenied};
use rewards_shared::AppError;
use rewards_shared::types::{CustomerId, VisitId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use super::SYSTEM_HANDLER;
use crate::entities::{admins, customers, visits};

/// Errors from visit operations.
#[derive(Debug, Error)]
pub enum VisitError {
    /// Only superadmins log visits.
    #[error(transparent)]
    PermissionDenied(#[from] PermissionDenied),

    /// Customer not found.
    #[error("Customer not found.")]
    CustomerNotFound,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<VisitError> for AppError {
    fn from(err: VisitError) -> Self {
        match err {
            VisitError::PermissionDenied(e) => e.into(),
            VisitError::CustomerNotFound => Self::NotFound(err.to_string()),
            VisitError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// A visit with the name of the admin who logged it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisitView {
    /// Visit ID.
    pub id: Uuid,
    /// Customer ID.
    pub customer_id: Uuid,
    /// Admin username, or "System".
    pub handled_by: String,
    /// When the visit happened.
    pub visit_date: DateTime<Utc>,
}

/// Visit log repository.
#[derive(Debug, Clone)]
pub struct VisitRepository {
    db: DatabaseConnection,
}

impl VisitRepository {
    /// Creates a new visit repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a visit. No effect on the ledger.
    pub async fn log_visit(
        &self,
        actor: &Actor,
        customer_id: CustomerId,
    ) -> Result<VisitView, VisitError> {
        actor.require(Capability::LogVisits)?;

        let id = customer_id.into_inner();
        if customers::Entity::find_by_id(id).one(&self.db).await?.is_none() {
            return Err(VisitError::CustomerNotFound);
        }

        let visit = visits::ActiveModel {
            id: Set(VisitId::new().into_inner()),
            customer_id: Set(id),
            admin_id: Set(Some(actor.admin_id.into_inner())),
            visit_date: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;

        tracing::info!(customer_id = %id, admin_id = %actor.admin_id, "Visit logged");

        Ok(VisitView {
            id: visit.id,
            customer_id: visit.customer_id,
            handled_by: actor.username.clone(),
            visit_date: visit.visit_date,
        })
    }

    /// Most recent visits for a customer, newest first.
    pub async fn recent(&self, customer_id: CustomerId, limit: u64) -> Result<Vec<VisitView>, DbErr> {
        let rows = visits::Entity::find()
            .filter(visits::Column::CustomerId.eq(customer_id.into_inner()))
            .order_by_desc(visits::Column::VisitDate)
            .order_by_desc(visits::Column::Id)
            .limit(limit)
            .find_also_related(admins::Entity)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(visit, admin)| VisitView {
                id: visit.id,
                customer_id: visit.customer_id,
                handled_by: admin.map_or_else(|| SYSTEM_HANDLER.to_string(), |a| a.username),
                visit_date: visit.visit_date,
            })
            .collect())
    }
}
