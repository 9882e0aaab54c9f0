//! This file defines the type `Transaction`, the core type of the ledger.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};
use uuid::Uuid;

use crate::Error;

/// The format used for transaction dates everywhere they are rendered as
/// text: the persisted JSON snapshot, the CSV interchange format, and error
/// messages.
pub const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Whether a transaction brought money in or sent money out.
///
/// Transaction amounts are always positive; the direction of the money is
/// encoded here and nowhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming in, e.g. salary.
    Income,
    /// Money going out, e.g. groceries.
    Expense,
}

impl FromStr for TransactionKind {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            _ => Err(Error::InvalidKind(text.to_owned())),
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Income => write!(f, "income"),
            TransactionKind::Expense => write!(f, "expense"),
        }
    }
}

/// An income or expense, i.e. an event where money was either earned or
/// spent.
///
/// Records are owned by a [TransactionStore](crate::stores::TransactionStore)
/// once added; querying and aggregation operate on immutable snapshots of
/// the store's collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Opaque unique identifier. Immutable once assigned.
    pub id: String,
    /// The calendar date the transaction happened.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// Free-text label describing the transaction.
    pub title: String,
    /// How much money was earned or spent. Always positive, see
    /// [Transaction::kind].
    pub amount: f64,
    /// The grouping key used for the category chart. The set of valid
    /// categories is enforced by the data entry form, not here.
    pub category: String,
    /// Whether this is an income or an expense.
    pub kind: TransactionKind,
}

impl Transaction {
    /// Create a transaction with a freshly generated ID.
    pub fn new(
        date: Date,
        title: impl Into<String>,
        amount: f64,
        category: impl Into<String>,
        kind: TransactionKind,
    ) -> Self {
        Self {
            id: new_transaction_id(),
            date,
            title: title.into(),
            amount,
            category: category.into(),
            kind,
        }
    }

    /// Check the record invariants that the store enforces on add and
    /// replace.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NonPositiveAmount] if the amount is zero, negative, NaN, or
    ///   infinite,
    /// - or [Error::EmptyTitle] if the title is empty after trimming.
    pub fn validate(&self) -> Result<(), Error> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(Error::NonPositiveAmount(self.amount));
        }

        if self.title.trim().is_empty() {
            return Err(Error::EmptyTitle);
        }

        Ok(())
    }
}

/// Generate a random unique transaction ID.
///
/// A v4 UUID rendered as text, so collisions are not a practical concern
/// even across imports from many files.
pub fn new_transaction_id() -> String {
    Uuid::new_v4().to_string()
}

/// Parse text as a `YYYY-MM-DD` calendar date.
///
/// # Errors
/// This function will return an [Error::InvalidDate] if the text is not a
/// valid date in that format.
pub fn parse_date(text: &str) -> Result<Date, Error> {
    Date::parse(text, &DATE_FORMAT).map_err(|_| Error::InvalidDate(text.to_owned()))
}
