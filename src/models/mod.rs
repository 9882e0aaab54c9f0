//! This module defines the domain data types.

pub use transaction::{DATE_FORMAT, Transaction, TransactionKind, new_transaction_id, parse_date};

mod transaction;
