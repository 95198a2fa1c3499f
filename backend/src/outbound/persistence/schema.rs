//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are
//! used by Diesel for compile-time query validation and type-safe SQL
//! generation.

diesel::table! {
    /// Individual spending events, scoped by owning user.
    ///
    /// Rows are inserted by the add operation and removed by the delete
    /// operation; nothing updates them in place.
    expenses (id) {
        /// Primary key, assigned by the database sequence.
        id -> Int8,
        /// Owning user; every query on this table filters by it.
        user_id -> Uuid,
        /// Non-negative amount spent.
        amount -> Numeric,
        /// Non-empty free-text description.
        description -> Text,
        /// Non-empty category label.
        category -> Text,
    }
}

diesel::table! {
    /// Denormalized per-user expense totals.
    ///
    /// One row per user, upserted by the summary recompute after every
    /// mutation of `expenses`. Rows are never deleted; a user with no
    /// expenses reads back as zero.
    expense_summaries (user_id) {
        /// Owning user and primary key.
        user_id -> Uuid,
        /// Current total of the user's expense amounts.
        total_amount -> Numeric,
    }
}

diesel::allow_tables_to_appear_in_same_query!(expenses, expense_summaries);
