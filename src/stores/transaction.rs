//! Defines the transaction store, the sole owner of a user's transaction
//! collection.

use std::collections::HashSet;

use crate::{
    Error,
    csv::CsvRecord,
    models::Transaction,
    stores::key_value::KeyValueStore,
};

/// The counts reported by [TransactionStore::merge_imported].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportOutcome {
    /// How many candidates were newly inserted.
    pub imported: usize,
    /// How many candidates were skipped because their ID was already in the
    /// store.
    pub duplicates: usize,
    /// How many candidates were skipped because they failed validation, e.g.
    /// a NaN amount or an unparseable date.
    pub invalid: usize,
}

/// Owns the canonical transaction collection for one user and persists it
/// through a [KeyValueStore].
///
/// The collection is read from the key-value store once when the store is
/// created, and the full collection is written back synchronously after
/// every mutation, exactly once per mutating call. Records iterate in
/// insertion order; display ordering is derived separately by
/// [filter_view](crate::query::filter_view).
#[derive(Debug)]
pub struct TransactionStore<K: KeyValueStore> {
    records: Vec<Transaction>,
    vault: K,
    storage_key: String,
}

/// The key a user's transaction collection is stored under.
fn storage_key(user_id: &str) -> String {
    format!("transactions_{user_id}")
}

impl<K: KeyValueStore> TransactionStore<K> {
    /// Create a store for `user_id`, loading any previously persisted
    /// collection from `vault`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::StorageError] if the vault cannot be read,
    /// - or [Error::JsonSerializationError] if the stored value is not a
    ///   valid transaction collection.
    pub fn new(vault: K, user_id: &str) -> Result<Self, Error> {
        let storage_key = storage_key(user_id);

        let records = match vault.get(&storage_key)? {
            Some(text) => serde_json::from_str(&text)
                .map_err(|error| Error::JsonSerializationError(error.to_string()))?,
            None => Vec::new(),
        };

        Ok(Self {
            records,
            vault,
            storage_key,
        })
    }

    /// The current snapshot of the collection, in insertion order.
    pub fn transactions(&self) -> &[Transaction] {
        &self.records
    }

    /// Append a transaction to the collection.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NonPositiveAmount] or [Error::EmptyTitle] if the record is
    ///   invalid,
    /// - or an error from persisting the updated collection.
    pub fn add(&mut self, transaction: Transaction) -> Result<(), Error> {
        transaction.validate()?;
        self.records.push(transaction);
        self.persist()
    }

    /// Replace the full record with the given `id`, including its ID.
    ///
    /// There is no partial-field patch; callers supply the complete new
    /// record. Because `transaction.id` is stored as given, IDs round-trip
    /// through an edit.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::TransactionNotFound] if no record has `id`,
    /// - [Error::NonPositiveAmount] or [Error::EmptyTitle] if the
    ///   replacement is invalid,
    /// - or an error from persisting the updated collection.
    pub fn replace(&mut self, id: &str, transaction: Transaction) -> Result<(), Error> {
        transaction.validate()?;

        let record = self
            .records
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or_else(|| Error::TransactionNotFound(id.to_owned()))?;

        *record = transaction;
        self.persist()
    }

    /// Remove the record with the given `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::TransactionNotFound] if no record has `id`,
    /// - or an error from persisting the updated collection.
    pub fn remove(&mut self, id: &str) -> Result<(), Error> {
        let index = self
            .records
            .iter()
            .position(|record| record.id == id)
            .ok_or_else(|| Error::TransactionNotFound(id.to_owned()))?;

        self.records.remove(index);
        self.persist()
    }

    /// Remove all records for this user and delete the persisted key.
    ///
    /// # Errors
    /// This function will return an [Error::StorageError] if the vault
    /// cannot be written.
    pub fn clear(&mut self) -> Result<(), Error> {
        self.records.clear();
        self.vault.remove(&self.storage_key)
    }

    /// Merge CSV import candidates into the collection, skipping candidates
    /// whose ID is already present and candidates that fail validation.
    ///
    /// Surviving candidates are inserted in the order given. Skipped rows
    /// never fail the merge; they are counted in the returned
    /// [ImportOutcome] and logged at the `debug` level.
    ///
    /// # Errors
    /// This function will return an error from persisting the updated
    /// collection. The persisted write happens at most once, after all
    /// candidates are processed.
    pub fn merge_imported(&mut self, candidates: Vec<CsvRecord>) -> Result<ImportOutcome, Error> {
        let mut seen_ids: HashSet<String> = self
            .records
            .iter()
            .map(|record| record.id.clone())
            .collect();
        let mut outcome = ImportOutcome::default();

        for candidate in candidates {
            let transaction = match Transaction::try_from(candidate) {
                Ok(transaction) => transaction,
                Err(error) => {
                    tracing::debug!("skipping imported row: {error}");
                    outcome.invalid += 1;
                    continue;
                }
            };

            if !seen_ids.insert(transaction.id.clone()) {
                outcome.duplicates += 1;
                continue;
            }

            self.records.push(transaction);
            outcome.imported += 1;
        }

        if outcome.imported > 0 {
            self.persist()?;
        }

        Ok(outcome)
    }

    /// Write the full collection to the key-value store.
    fn persist(&mut self) -> Result<(), Error> {
        let text = serde_json::to_string(&self.records)
            .map_err(|error| Error::JsonSerializationError(error.to_string()))?;

        self.vault.set(&self.storage_key, &text)
    }
}
