//! `SeaORM` Entity for point_transactions table.
//!
//! Rows are only ever inserted. A customer's balance is the sum of `points`.

use rewards_core::ledger::TransactionKind;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "point_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_id: Uuid,
    /// `None` once the admin is deleted, or for system-issued entries.
    pub admin_id: Option<Uuid>,
    pub transaction_type: String,
    pub points: i64,
    pub created_at: DateTimeUtc,
}

impl Model {
    /// Parsed entry kind.
    #[must_use]
    pub fn kind(&self) -> TransactionKind {
        kind_of(&self.transaction_type, self.points)
    }
}

/// Parses a stored label. Unknown labels fall back to the sign of `points`.
#[must_use]
pub fn kind_of(label: &str, points: i64) -> TransactionKind {
    label.parse().unwrap_or(if points < 0 {
        TransactionKind::Subtract
    } else {
        TransactionKind::Add
    })
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customers::Entity",
        from = "Column::CustomerId",
        to = "super::customers::Column::Id",
        on_delete = "Cascade"
    )]
    Customers,
    #[sea_orm(
        belongs_to = "super::admins::Entity",
        from = "Column::AdminId",
        to = "super::admins::Column::Id",
        on_delete = "SetNull"
    )]
    Admins,
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customers.def()
    }
}

impl Related<super::admins::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Admins.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
