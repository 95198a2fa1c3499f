//! Expense aggregate and its validated field types.
//!
//! The original inputs for an expense arrive as loosely typed request fields.
//! Everything here enforces the domain invariants up front: amounts are
//! finite non-negative decimals, descriptions and categories are non-empty,
//! and identifiers are assigned by storage and never guessed.

use std::fmt;
use std::str::FromStr;

use bigdecimal::{BigDecimal, ToPrimitive, Zero};

use super::UserId;

/// Validation errors returned when constructing an [`Amount`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountValidationError {
    /// The raw input did not parse as a decimal number.
    #[error("amount must be a number")]
    NotANumber,
    /// The parsed value was below zero.
    #[error("amount must not be negative")]
    Negative,
}

/// A finite, non-negative monetary amount.
///
/// Backed by [`BigDecimal`] so sums over many rows never lose precision the
/// way repeated `f64` addition would.
///
/// # Examples
/// ```
/// use backend::domain::Amount;
///
/// let amount = Amount::parse("49.99").expect("valid amount");
/// assert_eq!(amount.to_string(), "49.99");
/// assert!(Amount::parse("abc").is_err());
/// assert!(Amount::parse("-1").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Amount(BigDecimal);

impl Amount {
    /// Parse and validate an amount from its textual form.
    pub fn parse(raw: &str) -> Result<Self, AmountValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AmountValidationError::NotANumber);
        }
        let value =
            BigDecimal::from_str(trimmed).map_err(|_| AmountValidationError::NotANumber)?;
        Self::from_decimal(value)
    }

    /// Validate an already-parsed decimal, e.g. a value read back from storage.
    pub fn from_decimal(value: BigDecimal) -> Result<Self, AmountValidationError> {
        if value < BigDecimal::zero() {
            return Err(AmountValidationError::Negative);
        }
        Ok(Self(value))
    }

    /// The zero amount, used when a user has no summary row.
    pub fn zero() -> Self {
        Self(BigDecimal::zero())
    }

    /// Borrow the underlying decimal.
    pub fn as_decimal(&self) -> &BigDecimal {
        &self.0
    }

    /// Lossy conversion for JSON responses, which carry amounts as numbers.
    ///
    /// Values beyond `f64` range saturate to `f64::MAX` rather than
    /// collapsing to zero or a non-finite number JSON cannot carry.
    pub fn to_f64(&self) -> f64 {
        match self.0.to_f64() {
            Some(value) if value.is_finite() => value,
            _ => f64::MAX,
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Amount> for BigDecimal {
    fn from(value: Amount) -> Self {
        value.0
    }
}

/// Storage-assigned expense identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExpenseId(i64);

impl ExpenseId {
    /// Wrap a raw identifier as assigned by storage.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// The raw identifier.
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ExpenseId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self)
    }
}

/// Validation errors for the free-text expense fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExpenseFieldValidationError {
    /// Description was empty after trimming.
    #[error("description must not be empty")]
    EmptyDescription,
    /// Category was empty after trimming.
    #[error("category must not be empty")]
    EmptyCategory,
}

/// Non-empty human-readable description of a spending event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description(String);

impl Description {
    /// Validate and construct a description.
    pub fn new(raw: impl Into<String>) -> Result<Self, ExpenseFieldValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(ExpenseFieldValidationError::EmptyDescription);
        }
        Ok(Self(raw))
    }

    /// Borrow the text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Description> for String {
    fn from(value: Description) -> Self {
        value.0
    }
}

/// Non-empty category label grouping related expenses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category(String);

impl Category {
    /// Validate and construct a category.
    pub fn new(raw: impl Into<String>) -> Result<Self, ExpenseFieldValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(ExpenseFieldValidationError::EmptyCategory);
        }
        Ok(Self(raw))
    }

    /// Borrow the text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.0
    }
}

/// A recorded spending event owned by exactly one user.
///
/// Created by the add operation, removed by the delete operation, never
/// updated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    /// Storage-assigned identifier.
    pub id: ExpenseId,
    /// Owning user; the isolation boundary for every operation.
    pub user_id: UserId,
    /// Amount spent.
    pub amount: Amount,
    /// What the money went on.
    pub description: Description,
    /// Grouping label.
    pub category: Category,
}

/// A validated expense awaiting insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    /// Owning user taken from the session, never from the body.
    pub user_id: UserId,
    /// Amount spent.
    pub amount: Amount,
    /// What the money went on.
    pub description: Description,
    /// Grouping label.
    pub category: Category,
}

/// A user's expense rows together with their cached total.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseOverview {
    /// All expense rows for the user, in storage order.
    pub expenses: Vec<Expense>,
    /// The summary total; zero when the user has no summary row.
    pub total: Amount,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("50")]
    #[case("49.99")]
    #[case(" 30 ")]
    #[case("0")]
    fn amount_accepts_non_negative_decimals(#[case] raw: &str) {
        assert!(Amount::parse(raw).is_ok());
    }

    #[rstest]
    #[case("abc", AmountValidationError::NotANumber)]
    #[case("", AmountValidationError::NotANumber)]
    #[case("  ", AmountValidationError::NotANumber)]
    #[case("12.3.4", AmountValidationError::NotANumber)]
    #[case("-0.01", AmountValidationError::Negative)]
    #[case("-50", AmountValidationError::Negative)]
    fn amount_rejects_invalid_input(#[case] raw: &str, #[case] expected: AmountValidationError) {
        assert_eq!(Amount::parse(raw), Err(expected));
    }

    #[rstest]
    fn amount_zero_is_zero() {
        assert_eq!(Amount::zero().to_f64(), 0.0);
    }

    #[rstest]
    fn amount_beyond_f64_range_saturates_instead_of_zeroing() {
        let huge = Amount::parse("1e400").expect("valid decimal");
        let value = huge.to_f64();
        assert!(value.is_finite());
        assert_eq!(value, f64::MAX);
    }

    #[rstest]
    fn expense_id_parses_integers_only() {
        assert_eq!("42".parse::<ExpenseId>(), Ok(ExpenseId::new(42)));
        assert!("4.2".parse::<ExpenseId>().is_err());
        assert!("abc".parse::<ExpenseId>().is_err());
    }

    #[rstest]
    fn description_and_category_reject_blank_text() {
        assert_eq!(
            Description::new("  "),
            Err(ExpenseFieldValidationError::EmptyDescription)
        );
        assert_eq!(
            Category::new(""),
            Err(ExpenseFieldValidationError::EmptyCategory)
        );
        assert!(Description::new("coffee").is_ok());
        assert!(Category::new("food").is_ok());
    }
}
