//! HTTP inbound adapter exposing REST endpoints.

pub(crate) mod auth;
pub mod error;
pub mod expenses;
pub mod health;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub(crate) mod validation;

pub use error::ApiResult;
