//! Defines the key-value store trait that abstracts persistence.

use std::collections::HashMap;

use crate::Error;

/// Handles the reading and writing of string values under string keys.
///
/// This is the persistence boundary of the ledger: the transaction store
/// serializes its whole collection as JSON and writes it under a single
/// user-scoped key after every mutation. Implementations decide where the
/// bytes actually live (browser storage, a file, a database row).
///
/// The ledger takes no cross-process locks; when several processes share one
/// key-value store, the last writer wins.
pub trait KeyValueStore {
    /// Read the value stored under `key`, or `None` if the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), Error>;

    /// Delete `key` and its value. Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), Error>;
}

/// An in-memory [KeyValueStore] backed by a hash map.
///
/// Suitable for tests and for embedders that load and save state through
/// their own persistence layer.
#[derive(Debug, Clone, Default)]
pub struct MemoryVault {
    entries: HashMap<String, String>,
}

impl MemoryVault {
    /// Create an empty vault.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryVault {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Error> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), Error> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod memory_vault_tests {
    use super::{KeyValueStore, MemoryVault};

    #[test]
    fn get_returns_none_for_absent_key() {
        let vault = MemoryVault::new();

        assert_eq!(vault.get("transactions_alice"), Ok(None));
    }

    #[test]
    fn set_then_get_round_trips() {
        let mut vault = MemoryVault::new();

        vault.set("transactions_alice", "[]").unwrap();

        assert_eq!(vault.get("transactions_alice"), Ok(Some("[]".to_owned())));
    }

    #[test]
    fn set_replaces_previous_value() {
        let mut vault = MemoryVault::new();

        vault.set("transactions_alice", "old").unwrap();
        vault.set("transactions_alice", "new").unwrap();

        assert_eq!(vault.get("transactions_alice"), Ok(Some("new".to_owned())));
    }

    #[test]
    fn remove_deletes_the_key() {
        let mut vault = MemoryVault::new();

        vault.set("transactions_alice", "[]").unwrap();
        vault.remove("transactions_alice").unwrap();

        assert_eq!(vault.get("transactions_alice"), Ok(None));
    }

    #[test]
    fn remove_of_absent_key_is_ok() {
        let mut vault = MemoryVault::new();

        assert_eq!(vault.remove("transactions_alice"), Ok(()));
    }
}
