//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data`, so the
//! storage adapter is injected explicitly rather than imported as a shared
//! module-level connection. Handlers stay testable without I/O by building
//! the state over the fixture store.

use std::sync::Arc;

use crate::domain::ExpenseService;
use crate::domain::ports::ExpenseStore;

/// Dependency bundle for HTTP handlers.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use backend::domain::ports::FixtureExpenseStore;
/// use backend::inbound::http::state::HttpState;
///
/// let state = HttpState::new(Arc::new(FixtureExpenseStore::default()));
/// let _expenses = state.expenses.clone();
/// ```
#[derive(Clone)]
pub struct HttpState {
    /// Expense use-cases backing the expense endpoints.
    pub expenses: ExpenseService,
}

impl HttpState {
    /// Construct state over a storage adapter.
    pub fn new(store: Arc<dyn ExpenseStore>) -> Self {
        Self {
            expenses: ExpenseService::new(store),
        }
    }
}
