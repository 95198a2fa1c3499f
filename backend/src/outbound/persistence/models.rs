//! Row types mapping the Diesel schema to and from domain values.

use bigdecimal::BigDecimal;
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::expenses;

/// A persisted expense row as read from the `expenses` table.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = expenses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ExpenseRow {
    /// Sequence-assigned primary key.
    pub id: i64,
    /// Owning user.
    pub user_id: Uuid,
    /// Amount spent.
    pub amount: BigDecimal,
    /// Free-text description.
    pub description: String,
    /// Category label.
    pub category: String,
}

/// Insertable expense row; the id comes from the database sequence.
#[derive(Debug, Insertable)]
#[diesel(table_name = expenses)]
pub struct NewExpenseRow<'a> {
    /// Owning user.
    pub user_id: Uuid,
    /// Amount spent.
    pub amount: &'a BigDecimal,
    /// Free-text description.
    pub description: &'a str,
    /// Category label.
    pub category: &'a str,
}
