//! Transaction aggregation for the balance summary and the category chart.

use std::collections::HashMap;

use crate::models::{Transaction, TransactionKind};

/// The overall balance summary for a transaction snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    /// The signed net amount, income minus expense. Presentation displays
    /// the magnitude and uses [Totals::is_negative] for styling.
    pub balance: f64,
    /// The sum of all income amounts.
    pub income: f64,
    /// The sum of all expense amounts.
    pub expense: f64,
    /// Whether the balance is below zero.
    pub is_negative: bool,
}

/// The income and expense sums for one category.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CategoryBucket {
    /// The sum of income amounts in this category.
    pub income: f64,
    /// The sum of expense amounts in this category.
    pub expense: f64,
}

/// Per-category sums plus the scale the chart draws against.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryBuckets {
    /// One bucket per category that has at least one transaction.
    /// Categories with no records are absent rather than zero-filled.
    pub buckets: HashMap<String, CategoryBucket>,
    /// The largest single bar value across all buckets, floored at 1 so
    /// bar-height ratios are well defined even with no data.
    pub max_amount: f64,
}

impl CategoryBuckets {
    /// The relative bar height for `value`, a ratio in `[0, 1]`.
    ///
    /// The caller maps the ratio onto its display scale, e.g. pixels.
    pub fn ratio(&self, value: f64) -> f64 {
        value / self.max_amount
    }
}

/// Compute the balance summary over a full transaction snapshot.
///
/// An empty snapshot yields all zeros with `is_negative` false.
pub fn compute_totals(all: &[Transaction]) -> Totals {
    let mut totals = Totals::default();

    for transaction in all {
        match transaction.kind {
            TransactionKind::Income => totals.income += transaction.amount,
            TransactionKind::Expense => totals.expense += transaction.amount,
        }
    }

    totals.balance = totals.income - totals.expense;
    totals.is_negative = totals.balance < 0.0;

    totals
}

/// Group a full transaction snapshot by category, accumulating each amount
/// into the income or expense side of its category's bucket.
pub fn compute_category_buckets(all: &[Transaction]) -> CategoryBuckets {
    let mut buckets: HashMap<String, CategoryBucket> = HashMap::new();

    for transaction in all {
        let bucket = buckets.entry(transaction.category.clone()).or_default();

        match transaction.kind {
            TransactionKind::Income => bucket.income += transaction.amount,
            TransactionKind::Expense => bucket.expense += transaction.amount,
        }
    }

    let max_amount = buckets
        .values()
        .map(|bucket| bucket.income.max(bucket.expense))
        .fold(1.0, f64::max);

    CategoryBuckets {
        buckets,
        max_amount,
    }
}
