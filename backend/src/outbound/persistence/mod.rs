//! PostgreSQL persistence adapter built on Diesel.

pub mod diesel_expense_store;
pub mod models;
pub mod pool;
pub mod schema;

pub use diesel_expense_store::DieselExpenseStore;
pub use pool::{DbPool, PoolConfig, PoolError};
