//! Ledgerly is the transaction core of a personal finance ledger: users
//! record income and expense transactions, view aggregated balances, filter
//! and search their history, chart category totals, and move data in and out
//! via CSV.
//!
//! This library provides the data pipeline behind those features. The
//! [TransactionStore] owns one user's collection and persists it through a
//! [KeyValueStore]; [filter_view], [compute_totals], and
//! [compute_category_buckets] are pure functions deriving views from
//! snapshots of that collection; [to_csv] and [parse_csv] implement the
//! interchange format. Input capture, rendering, and the choice of
//! persistence backend belong to the embedding application.

#![warn(missing_docs)]

mod aggregation;
mod csv;
mod error;
mod models;
mod query;
mod stores;

pub use aggregation::{
    CategoryBucket, CategoryBuckets, Totals, compute_category_buckets, compute_totals,
};
pub use csv::{CSV_HEADER, CsvRecord, parse_csv, to_csv};
pub use error::Error;
pub use models::{DATE_FORMAT, Transaction, TransactionKind, new_transaction_id, parse_date};
pub use query::{FilterSpec, filter_view};
pub use stores::{ImportOutcome, KeyValueStore, MemoryVault, TransactionStore};
