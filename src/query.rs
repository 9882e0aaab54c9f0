//! Pure filtering and ordering of transaction snapshots.

use std::ops::RangeInclusive;

use time::Date;

use crate::models::{Transaction, TransactionKind};

/// Defines which transactions [filter_view] keeps.
///
/// Each axis is independently optional; `None` means no filtering on that
/// axis, and the active axes are ANDed together.
#[derive(Debug, Clone, Default)]
pub struct FilterSpec {
    /// Keep transactions whose title contains this term, case-insensitively.
    pub search_term: Option<String>,
    /// Keep transactions with exactly this category.
    pub category: Option<String>,
    /// Keep transactions of this kind.
    pub kind: Option<TransactionKind>,
    /// Keep transactions dated within this range (inclusive).
    pub date_range: Option<RangeInclusive<Date>>,
}

/// Derive the display view of a transaction snapshot: the records matching
/// `spec`, ordered by date descending.
///
/// The sort is stable, so transactions sharing a date keep their relative
/// order from the input. The input is never mutated; the view is an
/// independent copy.
pub fn filter_view(all: &[Transaction], spec: &FilterSpec) -> Vec<Transaction> {
    let search_term = spec.search_term.as_deref().map(str::to_lowercase);

    let mut view: Vec<Transaction> = all
        .iter()
        .filter(|transaction| {
            if let Some(term) = &search_term
                && !transaction.title.to_lowercase().contains(term)
            {
                return false;
            }

            if let Some(category) = &spec.category
                && transaction.category != *category
            {
                return false;
            }

            if let Some(kind) = spec.kind
                && transaction.kind != kind
            {
                return false;
            }

            if let Some(date_range) = &spec.date_range
                && !date_range.contains(&transaction.date)
            {
                return false;
            }

            true
        })
        .cloned()
        .collect();

    view.sort_by(|a, b| b.date.cmp(&a.date));

    view
}
