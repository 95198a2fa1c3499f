//! Expense use-cases shared by every inbound adapter.
//!
//! The service owns the mapping from storage failures to domain errors:
//! failures are logged with context here, once, and surface to callers as a
//! generic internal error carrying no storage detail.

use std::sync::Arc;

use tracing::error;

use super::ports::{DeleteOutcome, ExpenseStore, ExpenseStoreError};
use super::{Amount, Error, Expense, ExpenseId, ExpenseOverview, NewExpense, UserId};

/// Use-cases over the [`ExpenseStore`] port.
#[derive(Clone)]
pub struct ExpenseService {
    store: Arc<dyn ExpenseStore>,
}

fn map_store_error(context: &'static str, err: &ExpenseStoreError) -> Error {
    error!(error = %err, context, "expense store operation failed");
    Error::internal("Internal server error")
}

impl ExpenseService {
    /// Construct the service over a storage adapter.
    pub fn new(store: Arc<dyn ExpenseStore>) -> Self {
        Self { store }
    }

    /// Fetch a user's expenses and their cached total.
    ///
    /// A user with no summary row reports a zero total rather than an error.
    pub async fn overview(&self, user_id: &UserId) -> Result<ExpenseOverview, Error> {
        let expenses = self
            .store
            .list(user_id)
            .await
            .map_err(|err| map_store_error("listing expenses", &err))?;
        let total = self
            .store
            .summary_total(user_id)
            .await
            .map_err(|err| map_store_error("reading expense summary", &err))?
            .unwrap_or_else(Amount::zero);
        Ok(ExpenseOverview { expenses, total })
    }

    /// Record a new expense, returning the stored row with its identifier.
    pub async fn add(&self, expense: NewExpense) -> Result<Expense, Error> {
        self.store
            .insert(expense)
            .await
            .map_err(|err| map_store_error("adding expense", &err))
    }

    /// Remove an expense owned by the caller.
    ///
    /// An id that does not exist, or that belongs to another user, yields the
    /// same not-found error.
    pub async fn remove(&self, user_id: &UserId, id: ExpenseId) -> Result<(), Error> {
        let outcome = self
            .store
            .delete(user_id, id)
            .await
            .map_err(|err| map_store_error("deleting expense", &err))?;
        match outcome {
            DeleteOutcome::Deleted => Ok(()),
            DeleteOutcome::NotFound => Err(Error::not_found("expense not found")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::FixtureExpenseStore;
    use crate::domain::{Category, Description, ErrorCode};
    use async_trait::async_trait;

    /// Store that fails every operation, for the 500 funnel.
    struct BrokenStore;

    #[async_trait]
    impl ExpenseStore for BrokenStore {
        async fn list(&self, _user_id: &UserId) -> Result<Vec<Expense>, ExpenseStoreError> {
            Err(ExpenseStoreError::connection("pool exhausted"))
        }

        async fn summary_total(
            &self,
            _user_id: &UserId,
        ) -> Result<Option<Amount>, ExpenseStoreError> {
            Err(ExpenseStoreError::query("relation missing"))
        }

        async fn insert(&self, _expense: NewExpense) -> Result<Expense, ExpenseStoreError> {
            Err(ExpenseStoreError::query("insert failed"))
        }

        async fn delete(
            &self,
            _user_id: &UserId,
            _id: ExpenseId,
        ) -> Result<DeleteOutcome, ExpenseStoreError> {
            Err(ExpenseStoreError::connection("pool exhausted"))
        }
    }

    fn new_expense(user_id: &UserId) -> NewExpense {
        NewExpense {
            user_id: user_id.clone(),
            amount: Amount::parse("50").expect("amount"),
            description: Description::new("coffee").expect("description"),
            category: Category::new("food").expect("category"),
        }
    }

    #[actix_web::test]
    async fn overview_reports_zero_total_without_summary_row() {
        let service = ExpenseService::new(Arc::new(FixtureExpenseStore::default()));
        let overview = service.overview(&UserId::random()).await.expect("overview");

        assert!(overview.expenses.is_empty());
        assert_eq!(overview.total, Amount::zero());
    }

    #[actix_web::test]
    async fn overview_includes_rows_and_cached_total() {
        let service = ExpenseService::new(Arc::new(FixtureExpenseStore::default()));
        let user = UserId::random();
        let stored = service.add(new_expense(&user)).await.expect("add");

        let overview = service.overview(&user).await.expect("overview");
        assert_eq!(overview.expenses, vec![stored]);
        assert_eq!(overview.total, Amount::parse("50").expect("amount"));
    }

    #[actix_web::test]
    async fn remove_maps_missing_rows_to_not_found() {
        let service = ExpenseService::new(Arc::new(FixtureExpenseStore::default()));
        let err = service
            .remove(&UserId::random(), ExpenseId::new(99))
            .await
            .expect_err("missing row");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[actix_web::test]
    async fn storage_failures_surface_as_generic_internal_errors() {
        let service = ExpenseService::new(Arc::new(BrokenStore));
        let user = UserId::random();

        let err = service.overview(&user).await.expect_err("overview fails");
        assert_eq!(err.code(), ErrorCode::InternalError);
        assert_eq!(err.message(), "Internal server error");

        let err = service.add(new_expense(&user)).await.expect_err("add fails");
        assert_eq!(err.code(), ErrorCode::InternalError);

        let err = service
            .remove(&user, ExpenseId::new(1))
            .await
            .expect_err("remove fails");
        assert_eq!(err.code(), ErrorCode::InternalError);
    }
}
