//! `SeaORM` Entity for admins table.

use rewards_core::auth::{Actor, AdminRole};
use rewards_shared::types::AdminId;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "admins")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Stored as text; anything but `superadmin` reads back as cashier.
    pub role: String,
    pub created_at: DateTimeUtc,
}

impl Model {
    /// Parsed role.
    #[must_use]
    pub fn role(&self) -> AdminRole {
        AdminRole::parse_lenient(&self.role)
    }

    /// Request-scoped actor for this admin.
    #[must_use]
    pub fn actor(&self) -> Actor {
        Actor::new(AdminId::from_uuid(self.id), self.username.clone(), self.role())
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::point_transactions::Entity")]
    PointTransactions,
    #[sea_orm(has_many = "super::visits::Entity")]
    Visits,
    #[sea_orm(has_many = "super::sessions::Entity")]
    Sessions,
}

impl Related<super::point_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PointTransactions.def()
    }
}

impl Related<super::visits::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Visits.def()
    }
}

impl Related<super::sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
