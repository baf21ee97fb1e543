//! Errors raised by the persistence gateway.
//!
//! # Design
//! Absence is not an error: lookups return `Option` and mutations report
//! whether a row was touched. Everything here means the store itself could
//! not do its job, so callers surface these as server-side faults.

use thiserror::Error;

use crate::model::ClientId;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The database rejected the statement or could not be reached.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Client fields could not be encoded for storage.
    #[error("failed to encode client fields: {0}")]
    Encode(#[source] serde_json::Error),

    /// A stored row holds fields that no longer decode.
    #[error("failed to decode stored fields of client {id}: {source}")]
    Decode {
        id: ClientId,
        #[source]
        source: serde_json::Error,
    },

    #[error("store connection lock poisoned")]
    Poisoned,
}
