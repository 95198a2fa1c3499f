//! Domain primitives and use-cases.
//!
//! Purpose: define strongly typed domain entities used by the HTTP and
//! persistence layers. Keep types immutable and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode — transport-agnostic failure payload.
//! - UserId / LoginCredentials — session-provided identity.
//! - Expense types — validated aggregate for spending events.
//! - ports — the `ExpenseStore` edge plus its test fixture.
//! - ExpenseService — the overview/add/remove use-cases.

pub mod error;
pub mod expense;
pub mod expense_service;
pub mod ports;
pub mod user;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::expense::{
    Amount, AmountValidationError, Category, Description, Expense, ExpenseFieldValidationError,
    ExpenseId, ExpenseOverview, NewExpense,
};
pub use self::expense_service::ExpenseService;
pub use self::user::{LoginCredentials, LoginValidationError, UserId, UserValidationError};
