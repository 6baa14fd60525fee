//! Points ledger repository.
//!
//! The only writer of `point_transactions`. Each action runs as one database
//! transaction: lock the customer row, read that customer's entries, decide
//! with `rewards_core::ledger::authorize`, insert one row, commit. Concurrent
//! actions on the same customer serialize on the row lock, so two subtracts
//! can never both pass against the same stale balance.

use chrono::{DateTime, Utc};
use rewards_core::auth::Actor;
use rewards_core::ledger::{
    LedgerError, LedgerSummary, PointsAction, TransactionKind, authorize, balance_of,
};
use rewards_shared::AppError;
use rewards_shared::types::{CustomerId, PageRequest, PointTransactionId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use super::SYSTEM_HANDLER;
use crate::entities::{admins, customers, point_transactions};

/// Errors from ledger operations.
#[derive(Debug, Error)]
pub enum LedgerStoreError {
    /// Customer not found.
    #[error("Customer not found.")]
    CustomerNotFound,

    /// The policy rejected the action; nothing was appended.
    #[error(transparent)]
    Rejected(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<LedgerStoreError> for AppError {
    fn from(err: LedgerStoreError) -> Self {
        match err {
            LedgerStoreError::CustomerNotFound => Self::NotFound(err.to_string()),
            LedgerStoreError::Rejected(e) => e.into(),
            LedgerStoreError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Result of an accepted action.
#[derive(Debug, Clone, Serialize)]
pub struct AppliedAction {
    /// The appended entry.
    pub entry: TransactionView,
    /// Balance after the append.
    pub balance: i64,
    /// Operator-facing confirmation.
    pub message: String,
}

/// A ledger entry with the name of the admin who recorded it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionView {
    /// Entry ID.
    pub id: Uuid,
    /// Customer ID.
    pub customer_id: Uuid,
    /// Entry kind.
    pub kind: TransactionKind,
    /// Signed delta.
    pub points: i64,
    /// Admin ID, if still known.
    pub admin_id: Option<Uuid>,
    /// Admin username, or "System".
    pub handled_by: String,
    /// When the entry was recorded.
    pub created_at: DateTime<Utc>,
}

impl TransactionView {
    fn new(entry: point_transactions::Model, admin: Option<&admins::Model>) -> Self {
        Self {
            kind: entry.kind(),
            id: entry.id,
            customer_id: entry.customer_id,
            points: entry.points,
            admin_id: entry.admin_id,
            handled_by: admin.map_or_else(|| SYSTEM_HANDLER.to_string(), |a| a.username.clone()),
            created_at: entry.created_at,
        }
    }
}

/// Reads a customer's balance on any connection or open transaction.
async fn balance_on<C: ConnectionTrait>(conn: &C, customer_id: Uuid) -> Result<i64, DbErr> {
    let points: Vec<i64> = point_transactions::Entity::find()
        .select_only()
        .column(point_transactions::Column::Points)
        .filter(point_transactions::Column::CustomerId.eq(customer_id))
        .into_tuple()
        .all(conn)
        .await?;

    Ok(balance_of(points))
}

/// Points ledger repository.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Current balance, recomputed from the ledger. Unknown customers read as 0.
    pub async fn balance(&self, customer_id: CustomerId) -> Result<i64, DbErr> {
        balance_on(&self.db, customer_id.into_inner()).await
    }

    /// Authorizes and records one points action atomically.
    pub async fn apply(
        &self,
        actor: &Actor,
        customer_id: CustomerId,
        action: PointsAction,
    ) -> Result<AppliedAction, LedgerStoreError> {
        let id = customer_id.into_inner();
        let txn = self.db.begin().await?;

        // Row lock serializes concurrent actions on this customer
        let customer = customers::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?;
        if customer.is_none() {
            txn.rollback().await?;
            return Err(LedgerStoreError::CustomerNotFound);
        }

        let current = balance_on(&txn, id).await?;
        let append = match authorize(actor, action, current) {
            Ok(append) => append,
            Err(rejection) => {
                txn.rollback().await?;
                tracing::info!(
                    customer_id = %id,
                    admin_id = %actor.admin_id,
                    kind = %action.kind(),
                    balance = current,
                    reason = %rejection,
                    "Points action rejected"
                );
                return Err(rejection.into());
            }
        };

        let entry = point_transactions::ActiveModel {
            id: Set(PointTransactionId::new().into_inner()),
            customer_id: Set(id),
            admin_id: Set(Some(actor.admin_id.into_inner())),
            transaction_type: Set(append.kind.as_str().to_string()),
            points: Set(append.points),
            created_at: Set(Utc::now()),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        tracing::info!(
            customer_id = %id,
            admin_id = %actor.admin_id,
            kind = %append.kind,
            points = append.points,
            balance = append.balance_after,
            "Points action recorded"
        );

        Ok(AppliedAction {
            entry: TransactionView {
                kind: append.kind,
                id: entry.id,
                customer_id: entry.customer_id,
                points: entry.points,
                admin_id: entry.admin_id,
                handled_by: actor.username.clone(),
                created_at: entry.created_at,
            },
            balance: append.balance_after,
            message: action.success_message(),
        })
    }

    /// Most recent entries for a customer, newest first.
    pub async fn recent(
        &self,
        customer_id: CustomerId,
        limit: u64,
    ) -> Result<Vec<TransactionView>, DbErr> {
        let rows = point_transactions::Entity::find()
            .filter(point_transactions::Column::CustomerId.eq(customer_id.into_inner()))
            .order_by_desc(point_transactions::Column::CreatedAt)
            .order_by_desc(point_transactions::Column::Id)
            .limit(limit)
            .find_also_related(admins::Entity)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(entry, admin)| TransactionView::new(entry, admin.as_ref()))
            .collect())
    }

    /// Paginated history for a customer, newest first.
    pub async fn history(
        &self,
        customer_id: CustomerId,
        page: &PageRequest,
    ) -> Result<(Vec<TransactionView>, u64), DbErr> {
        let page = page.clamped();
        let paginator = point_transactions::Entity::find()
            .filter(point_transactions::Column::CustomerId.eq(customer_id.into_inner()))
            .order_by_desc(point_transactions::Column::CreatedAt)
            .order_by_desc(point_transactions::Column::Id)
            .find_also_related(admins::Entity)
            .paginate(&self.db, page.limit());

        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(u64::from(page.page - 1)).await?;

        Ok((
            rows.into_iter()
                .map(|(entry, admin)| TransactionView::new(entry, admin.as_ref()))
                .collect(),
            total,
        ))
    }

    /// Totals for the dashboard.
    pub async fn summary(&self) -> Result<LedgerSummary, DbErr> {
        let total_customers = customers::Entity::find().count(&self.db).await?;

        let rows: Vec<(String, i64)> = point_transactions::Entity::find()
            .select_only()
            .column(point_transactions::Column::TransactionType)
            .column(point_transactions::Column::Points)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(LedgerSummary::fold(
            total_customers,
            rows.into_iter()
                .map(|(label, points)| (point_transactions::kind_of(&label, points), points)),
        ))
    }
}
