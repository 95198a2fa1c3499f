//! PostgreSQL-backed `ExpenseStore` implementation using Diesel ORM.
//!
//! This adapter implements the domain's `ExpenseStore` port. Every mutation
//! runs together with the summary recompute inside one transaction, so a
//! committed expense row is always matched by an up-to-date summary: readers
//! never observe a total that excludes a committed write, and a failed
//! recompute rolls the triggering write back instead of stranding it.

use async_trait::async_trait;
use bigdecimal::{BigDecimal, Zero};
use diesel::dsl::sum;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{DeleteOutcome, ExpenseStore, ExpenseStoreError};
use crate::domain::{Amount, Category, Description, Expense, ExpenseId, NewExpense, UserId};

use super::models::{ExpenseRow, NewExpenseRow};
use super::pool::{DbPool, PoolError};
use super::schema::{expense_summaries, expenses};

/// Diesel-backed implementation of the `ExpenseStore` port.
#[derive(Clone)]
pub struct DieselExpenseStore {
    pool: DbPool,
}

impl DieselExpenseStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain expense store errors.
fn map_pool_error(error: PoolError) -> ExpenseStoreError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            ExpenseStoreError::connection(message)
        }
    }
}

/// Map Diesel errors to domain expense store errors.
fn map_diesel_error(error: diesel::result::Error) -> ExpenseStoreError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => ExpenseStoreError::query("record not found"),
        DieselError::QueryBuilderError(_) => ExpenseStoreError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            ExpenseStoreError::connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => ExpenseStoreError::query("database error"),
        _ => ExpenseStoreError::query("database error"),
    }
}

/// Convert a database row to a domain expense.
///
/// Stored rows satisfy the domain invariants by construction; a row that
/// fails validation here indicates the table was mutated outside this
/// adapter and is reported as a query error.
fn row_to_expense(row: ExpenseRow) -> Result<Expense, ExpenseStoreError> {
    let amount = Amount::from_decimal(row.amount)
        .map_err(|err| ExpenseStoreError::query(format!("stored amount invalid: {err}")))?;
    let description = Description::new(row.description)
        .map_err(|err| ExpenseStoreError::query(format!("stored description invalid: {err}")))?;
    let category = Category::new(row.category)
        .map_err(|err| ExpenseStoreError::query(format!("stored category invalid: {err}")))?;

    Ok(Expense {
        id: ExpenseId::new(row.id),
        user_id: UserId::from_uuid(row.user_id),
        amount,
        description,
        category,
    })
}

/// Recompute and persist one user's summary from their expense rows.
///
/// `SUM` over zero rows yields NULL; that is coalesced to zero so a user
/// whose last expense was deleted keeps a zero-valued summary row. The
/// upsert is last-writer-wins: whichever transaction commits later has read
/// the later state of `expenses`.
async fn refresh_summary<C>(conn: &mut C, user_id: Uuid) -> Result<(), diesel::result::Error>
where
    C: AsyncConnection<Backend = diesel::pg::Pg> + Send,
{
    let total: Option<BigDecimal> = expenses::table
        .filter(expenses::user_id.eq(user_id))
        .select(sum(expenses::amount))
        .first(conn)
        .await?;
    let total = total.unwrap_or_else(BigDecimal::zero);

    diesel::insert_into(expense_summaries::table)
        .values((
            expense_summaries::user_id.eq(user_id),
            expense_summaries::total_amount.eq(&total),
        ))
        .on_conflict(expense_summaries::user_id)
        .do_update()
        .set(expense_summaries::total_amount.eq(&total))
        .execute(conn)
        .await?;

    Ok(())
}

#[async_trait]
impl ExpenseStore for DieselExpenseStore {
    async fn list(&self, user_id: &UserId) -> Result<Vec<Expense>, ExpenseStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ExpenseRow> = expenses::table
            .filter(expenses::user_id.eq(user_id.as_uuid()))
            .select(ExpenseRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_expense).collect()
    }

    async fn summary_total(&self, user_id: &UserId) -> Result<Option<Amount>, ExpenseStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: Option<BigDecimal> = expense_summaries::table
            .filter(expense_summaries::user_id.eq(user_id.as_uuid()))
            .select(expense_summaries::total_amount)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        total
            .map(|value| {
                Amount::from_decimal(value).map_err(|err| {
                    ExpenseStoreError::query(format!("stored total invalid: {err}"))
                })
            })
            .transpose()
    }

    async fn insert(&self, expense: NewExpense) -> Result<Expense, ExpenseStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let owner = *expense.user_id.as_uuid();

        let row = conn
            .transaction::<ExpenseRow, diesel::result::Error, _>(|conn| {
                async move {
                    let new_row = NewExpenseRow {
                        user_id: owner,
                        amount: expense.amount.as_decimal(),
                        description: expense.description.as_str(),
                        category: expense.category.as_str(),
                    };
                    let row = diesel::insert_into(expenses::table)
                        .values(&new_row)
                        .returning(ExpenseRow::as_returning())
                        .get_result(conn)
                        .await?;
                    refresh_summary(conn, owner).await?;
                    Ok(row)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        row_to_expense(row)
    }

    async fn delete(
        &self,
        user_id: &UserId,
        id: ExpenseId,
    ) -> Result<DeleteOutcome, ExpenseStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let owner = *user_id.as_uuid();

        let affected = conn
            .transaction::<usize, diesel::result::Error, _>(|conn| {
                async move {
                    // Ownership is enforced by the predicate, not a prior read.
                    let affected = diesel::delete(
                        expenses::table.filter(
                            expenses::id.eq(id.value()).and(expenses::user_id.eq(owner)),
                        ),
                    )
                    .execute(conn)
                    .await?;
                    if affected > 0 {
                        refresh_summary(conn, owner).await?;
                    }
                    Ok(affected)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        if affected == 0 {
            Ok(DeleteOutcome::NotFound)
        } else {
            Ok(DeleteOutcome::Deleted)
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the error and row mappings; statement
    //! behaviour against a live database is exercised by deployments'
    //! own migrations.
    use super::*;
    use bigdecimal::FromPrimitive;
    use rstest::rstest;

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let pool_err = PoolError::checkout("connection refused");
        let store_err = map_pool_error(pool_err);

        assert!(matches!(store_err, ExpenseStoreError::Connection { .. }));
        assert!(store_err.to_string().contains("connection refused"));
    }

    #[rstest]
    fn diesel_not_found_maps_to_query_error() {
        let store_err = map_diesel_error(diesel::result::Error::NotFound);

        assert!(matches!(store_err, ExpenseStoreError::Query { .. }));
        assert!(store_err.to_string().contains("record not found"));
    }

    #[rstest]
    fn row_to_expense_converts_valid_rows() {
        let row = ExpenseRow {
            id: 7,
            user_id: Uuid::new_v4(),
            amount: BigDecimal::from_f64(49.99).expect("decimal"),
            description: "coffee".to_owned(),
            category: "food".to_owned(),
        };

        let expense = row_to_expense(row.clone()).expect("valid row");
        assert_eq!(expense.id, ExpenseId::new(7));
        assert_eq!(expense.user_id.as_uuid(), &row.user_id);
        assert_eq!(expense.description.as_str(), "coffee");
        assert_eq!(expense.category.as_str(), "food");
    }

    #[rstest]
    fn row_to_expense_rejects_rows_violating_invariants() {
        let negative = ExpenseRow {
            id: 1,
            user_id: Uuid::new_v4(),
            amount: BigDecimal::from(-5),
            description: "coffee".to_owned(),
            category: "food".to_owned(),
        };
        assert!(matches!(
            row_to_expense(negative),
            Err(ExpenseStoreError::Query { .. })
        ));

        let blank = ExpenseRow {
            id: 2,
            user_id: Uuid::new_v4(),
            amount: BigDecimal::from(5),
            description: "  ".to_owned(),
            category: "food".to_owned(),
        };
        assert!(matches!(
            row_to_expense(blank),
            Err(ExpenseStoreError::Query { .. })
        ));
    }
}
