//! Contains the transaction store and the key-value persistence boundary it
//! writes through.

mod key_value;
mod transaction;

pub use key_value::{KeyValueStore, MemoryVault};
pub use transaction::{ImportOutcome, TransactionStore};
