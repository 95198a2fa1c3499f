//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to interact with driven adapters.
//! Each trait exposes strongly typed errors so adapters map their failures
//! into predictable variants instead of returning `anyhow::Result`.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bigdecimal::{BigDecimal, Zero};
use thiserror::Error as ThisError;

use super::{Amount, Expense, ExpenseId, NewExpense, UserId};

/// Errors surfaced by the expense storage adapter.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum ExpenseStoreError {
    /// Database connectivity or pool checkout failures.
    #[error("expense store connection failed: {message}")]
    Connection {
        /// Adapter-provided context.
        message: String,
    },
    /// Statement execution failures that bubble up from the adapter.
    #[error("expense store query failed: {message}")]
    Query {
        /// Adapter-provided context.
        message: String,
    },
}

impl ExpenseStoreError {
    /// Helper for connection-level adapter errors.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for statement-level adapter errors.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Affected-row outcome of a delete statement.
///
/// `NotFound` covers both "never existed" and "belongs to another user";
/// the two are indistinguishable by design so identifiers do not leak
/// across users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Exactly one row matched the id and owning user and was removed.
    Deleted,
    /// No row matched the predicate.
    NotFound,
}

/// Durable storage for expense rows and the per-user summary cache.
///
/// ## Consistency contract
///
/// After `insert` or a `delete` that removed a row, the user's summary total
/// equals the sum of their remaining expense amounts. Adapters achieve this
/// by running the mutation and the summary recompute atomically, so callers
/// never observe a committed expense without a matching summary.
#[async_trait]
pub trait ExpenseStore: Send + Sync {
    /// Fetch all expense rows for a user in storage order.
    async fn list(&self, user_id: &UserId) -> Result<Vec<Expense>, ExpenseStoreError>;

    /// Fetch the cached summary total, or `None` when no summary row exists.
    async fn summary_total(&self, user_id: &UserId) -> Result<Option<Amount>, ExpenseStoreError>;

    /// Insert a new expense and refresh the owner's summary, returning the
    /// stored row with its assigned identifier.
    async fn insert(&self, expense: NewExpense) -> Result<Expense, ExpenseStoreError>;

    /// Delete the expense matching both id and owning user, refreshing the
    /// summary when a row was removed.
    async fn delete(
        &self,
        user_id: &UserId,
        id: ExpenseId,
    ) -> Result<DeleteOutcome, ExpenseStoreError>;
}

#[derive(Debug, Default)]
struct FixtureState {
    next_id: i64,
    rows: Vec<Expense>,
    summaries: HashMap<UserId, BigDecimal>,
}

impl FixtureState {
    fn refresh_summary(&mut self, user_id: &UserId) {
        let total: BigDecimal = self
            .rows
            .iter()
            .filter(|row| &row.user_id == user_id)
            .fold(BigDecimal::zero(), |acc, row| {
                acc + row.amount.as_decimal()
            });
        self.summaries.insert(user_id.clone(), total);
    }
}

/// In-memory [`ExpenseStore`] used by handler tests and doctests.
///
/// Maintains the same denormalized summary map a database adapter would, so
/// tests observe totals through the summary cache rather than recomputing
/// them from the rows they just wrote.
///
/// # Examples
/// ```
/// use backend::domain::ports::{ExpenseStore, FixtureExpenseStore};
/// use backend::domain::{Amount, Category, Description, NewExpense, UserId};
///
/// # actix_web::rt::System::new().block_on(async {
/// let store = FixtureExpenseStore::default();
/// let user = UserId::random();
/// let stored = store
///     .insert(NewExpense {
///         user_id: user.clone(),
///         amount: Amount::parse("50").expect("amount"),
///         description: Description::new("coffee").expect("description"),
///         category: Category::new("food").expect("category"),
///     })
///     .await
///     .expect("insert");
/// assert_eq!(stored.id.value(), 1);
/// # });
/// ```
#[derive(Debug, Default)]
pub struct FixtureExpenseStore {
    state: Mutex<FixtureState>,
}

impl FixtureExpenseStore {
    fn lock(&self) -> std::sync::MutexGuard<'_, FixtureState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl ExpenseStore for FixtureExpenseStore {
    async fn list(&self, user_id: &UserId) -> Result<Vec<Expense>, ExpenseStoreError> {
        let state = self.lock();
        Ok(state
            .rows
            .iter()
            .filter(|row| &row.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn summary_total(&self, user_id: &UserId) -> Result<Option<Amount>, ExpenseStoreError> {
        let state = self.lock();
        state
            .summaries
            .get(user_id)
            .cloned()
            .map(|total| {
                Amount::from_decimal(total)
                    .map_err(|err| ExpenseStoreError::query(err.to_string()))
            })
            .transpose()
    }

    async fn insert(&self, expense: NewExpense) -> Result<Expense, ExpenseStoreError> {
        let mut state = self.lock();
        state.next_id += 1;
        let stored = Expense {
            id: ExpenseId::new(state.next_id),
            user_id: expense.user_id,
            amount: expense.amount,
            description: expense.description,
            category: expense.category,
        };
        state.rows.push(stored.clone());
        let owner = stored.user_id.clone();
        state.refresh_summary(&owner);
        Ok(stored)
    }

    async fn delete(
        &self,
        user_id: &UserId,
        id: ExpenseId,
    ) -> Result<DeleteOutcome, ExpenseStoreError> {
        let mut state = self.lock();
        let before = state.rows.len();
        state
            .rows
            .retain(|row| !(row.id == id && &row.user_id == user_id));
        if state.rows.len() == before {
            return Ok(DeleteOutcome::NotFound);
        }
        state.refresh_summary(user_id);
        Ok(DeleteOutcome::Deleted)
    }
}
