//! Customer repository for database operations.

use rewards_core::directory::{CustomerDraft, PhoneNumber, SearchTerm};
use rewards_shared::AppError;
use rewards_shared::types::{CustomerId, PageRequest};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, Set,
    sea_query::{Expr, Func, LikeExpr},
};
use thiserror::Error;

use super::is_unique_violation;
use crate::entities::customers;

/// Errors from customer operations.
#[derive(Debug, Error)]
pub enum CustomerError {
    /// Customer not found.
    #[error("Customer not found.")]
    NotFound,

    /// Another customer already has this phone number.
    #[error("This phone number is already registered. Please try again.")]
    DuplicatePhone,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<CustomerError> for AppError {
    fn from(err: CustomerError) -> Self {
        match err {
            CustomerError::NotFound => Self::NotFound(err.to_string()),
            CustomerError::DuplicatePhone => Self::Conflict(err.to_string()),
            CustomerError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

fn map_insert_error(err: DbErr) -> CustomerError {
    if is_unique_violation(&err) {
        CustomerError::DuplicatePhone
    } else {
        CustomerError::Database(err)
    }
}

/// Customer repository for CRUD and lookup.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    db: DatabaseConnection,
}

impl CustomerRepository {
    /// Creates a new customer repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a customer by ID.
    pub async fn find_by_id(&self, id: CustomerId) -> Result<Option<customers::Model>, DbErr> {
        customers::Entity::find_by_id(id.into_inner()).one(&self.db).await
    }

    /// Finds a customer by ID, failing with `NotFound`.
    pub async fn get(&self, id: CustomerId) -> Result<customers::Model, CustomerError> {
        self.find_by_id(id).await?.ok_or(CustomerError::NotFound)
    }

    /// Finds a customer by exact phone number.
    pub async fn find_by_phone(
        &self,
        phone: &PhoneNumber,
    ) -> Result<Option<customers::Model>, DbErr> {
        customers::Entity::find()
            .filter(customers::Column::Phone.eq(phone.as_str()))
            .one(&self.db)
            .await
    }

    /// Finds the most recently joined customer whose phone or name contains the term.
    pub async fn search_one(&self, term: &SearchTerm) -> Result<Option<customers::Model>, DbErr> {
        customers::Entity::find()
            .filter(search_condition(term))
            .order_by_desc(customers::Column::JoinedAt)
            .one(&self.db)
            .await
    }

    /// Lists customers, newest first, optionally filtered by a search term.
    ///
    /// Returns the page and the total number of matches.
    pub async fn list(
        &self,
        page: &PageRequest,
        search: Option<&SearchTerm>,
    ) -> Result<(Vec<customers::Model>, u64), DbErr> {
        let page = page.clamped();
        let mut query = customers::Entity::find().order_by_desc(customers::Column::JoinedAt);
        if let Some(term) = search {
            query = query.filter(search_condition(term));
        }

        let paginator = query.paginate(&self.db, page.limit());
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(u64::from(page.page - 1)).await?;

        Ok((items, total))
    }

    /// Counts all customers.
    pub async fn count(&self) -> Result<u64, DbErr> {
        customers::Entity::find().count(&self.db).await
    }

    /// Enrolls a customer.
    ///
    /// The pre-insert lookup only gives an early answer; the UNIQUE constraint
    /// on `phone` decides races.
    pub async fn create(&self, draft: &CustomerDraft) -> Result<customers::Model, CustomerError> {
        if self.find_by_phone(&draft.phone).await?.is_some() {
            return Err(CustomerError::DuplicatePhone);
        }

        let customer = customers::ActiveModel {
            id: Set(CustomerId::new().into_inner()),
            phone: Set(draft.phone.as_str().to_string()),
            name: Set(draft.name.clone()),
            email: Set(draft.email.clone()),
            joined_at: Set(chrono::Utc::now()),
        };

        let model = customer.insert(&self.db).await.map_err(map_insert_error)?;
        tracing::info!(customer_id = %model.id, "Customer enrolled");
        Ok(model)
    }

    /// Replaces a customer's phone, name and email.
    pub async fn update(
        &self,
        id: CustomerId,
        draft: &CustomerDraft,
    ) -> Result<customers::Model, CustomerError> {
        let existing = self.get(id).await?;

        if let Some(other) = self.find_by_phone(&draft.phone).await?
            && other.id != existing.id
        {
            return Err(CustomerError::DuplicatePhone);
        }

        let mut active = existing.into_active_model();
        active.phone = Set(draft.phone.as_str().to_string());
        active.name = Set(draft.name.clone());
        active.email = Set(draft.email.clone());

        active.update(&self.db).await.map_err(map_insert_error)
    }

    /// Deletes a customer together with its ledger entries and visits.
    pub async fn delete(&self, id: CustomerId) -> Result<(), CustomerError> {
        let result = customers::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(CustomerError::NotFound);
        }
        tracing::info!(customer_id = %id, "Customer deleted");
        Ok(())
    }
}

/// Phone substring, or case-insensitive name substring.
fn search_condition(term: &SearchTerm) -> Condition {
    let escaped = escape_like(term.as_str());
    Condition::any()
        .add(customers::Column::Phone.like(contains_pattern(&escaped)))
        .add(
            Expr::expr(Func::lower(Expr::col((
                customers::Entity,
                customers::Column::Name,
            ))))
            .like(contains_pattern(&escaped.to_lowercase())),
        )
}

fn contains_pattern(escaped: &str) -> LikeExpr {
    LikeExpr::new(format!("%{escaped}%")).escape('\\')
}

/// Escapes LIKE wildcards so the term matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
