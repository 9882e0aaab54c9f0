//! Defines the crate level error type.

/// The errors that may occur while storing, querying, or importing
/// transactions.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A transaction was created or replaced with a zero, negative, or
    /// non-finite amount.
    ///
    /// Amounts are always positive; whether money came in or went out is
    /// encoded by the transaction kind instead of the sign.
    #[error("transaction amounts must be positive, got {0}")]
    NonPositiveAmount(f64),

    /// A transaction was created or replaced with a title that is empty after
    /// trimming whitespace.
    #[error("transaction titles must not be empty")]
    EmptyTitle,

    /// A date string could not be parsed as a `YYYY-MM-DD` calendar date.
    #[error("could not parse \"{0}\" as a YYYY-MM-DD date")]
    InvalidDate(String),

    /// A string was neither `income` nor `expense`.
    #[error("\"{0}\" is not a transaction kind, expected \"income\" or \"expense\"")]
    InvalidKind(String),

    /// A replace or remove referenced an ID that is not in the store.
    #[error("no transaction with the ID \"{0}\"")]
    TransactionNotFound(String),

    /// The CSV text could not be tokenized at all.
    ///
    /// Individual malformed rows are skipped without raising this error; it
    /// is reserved for input whose structure is broken for the whole file,
    /// such as an unterminated quoted field.
    #[error("could not parse the CSV data: {0}")]
    InvalidCsv(String),

    /// The stored transaction collection could not be serialized or
    /// deserialized as JSON.
    ///
    /// The underlying error is carried as a string so this type stays
    /// comparable in tests.
    #[error("could not read or write the stored transactions as JSON: {0}")]
    JsonSerializationError(String),

    /// The underlying key-value store failed to read or write.
    #[error("the key-value store failed: {0}")]
    StorageError(String),
}
