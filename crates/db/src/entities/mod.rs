//! `SeaORM` entity definitions.

pub mod admins;
pub mod customers;
pub mod point_transactions;
pub mod sessions;
pub mod visits;

pub mod prelude {
    //! Entity re-exports.
    pub use super::admins::Entity as Admins;
    pub use super::customers::Entity as Customers;
    pub use super::point_transactions::Entity as PointTransactions;
    pub use super::sessions::Entity as Sessions;
    pub use super::visits::Entity as Visits;
}
