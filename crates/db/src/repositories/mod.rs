//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod admin;
pub mod customer;
pub mod ledger;
pub mod session;
pub mod visit;

pub use admin::{AdminError, AdminRepository, AdminUpdate};
pub use customer::{CustomerError, CustomerRepository};
pub use ledger::{AppliedAction, LedgerRepository, LedgerStoreError, TransactionView};
pub use session::SessionRepository;
pub use visit::{VisitError, VisitRepository, VisitView};

use sea_orm::{DbErr, SqlErr};

/// Label for entries whose admin is unknown or deleted.
pub const SYSTEM_HANDLER: &str = "System";

/// Returns true if `err` is a UNIQUE constraint violation.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
