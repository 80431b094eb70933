//! Error types for event ingestion.

use thiserror::Error;

/// Why an event was rejected.
///
/// None of these are fatal: the store is left untouched and the next event
/// is processed normally.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("event is missing a transaction id")]
    MissingTxnId,

    #[error("first event for transaction {txn_id} is missing required field '{field}'")]
    MissingField { txn_id: String, field: &'static str },

    #[error("transaction {txn_id} reports zero attempts")]
    ZeroAttempts { txn_id: String },

    #[error("transaction {txn_id} has a negative amount")]
    NegativeAmount { txn_id: String },

    #[error("ingestion task is no longer running")]
    Closed,
}
