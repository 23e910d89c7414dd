//! Durable persistence of verification requests.
//!
//! Records are keyed by `RequestId` and independent of each other; no
//! cross-record locking exists anywhere. The one concurrency hazard is
//! duplicate callback delivery for the same id, which `update_if_pending`
//! absorbs: the pending -> terminal transition is a single conditional
//! write, so exactly one caller wins it.

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;

use crate::request::{RequestId, VerificationRequest};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("duplicate request id: {0}")]
    DuplicateId(String),

    /// Persistence layer failure; fatal to the triggering call.
    #[error("store backend error: {0}")]
    Backend(String),

    /// A persisted record no longer decodes.
    #[error("stored record corrupt: {0}")]
    Corrupt(String),
}

/// Terminal transition applied by `update_if_pending`.
#[derive(Debug, Clone)]
pub enum TerminalOutcome {
    /// Valid proof ingested and bound: result and verified_at set together.
    Completed {
        result: serde_json::Value,
        verified_at: u64,
    },

    /// Provider-reported verification failure. Part of the enumerated
    /// contract; nothing triggers it today.
    Failed,
}

/// Key-value persistence of verification-request records.
#[async_trait]
pub trait RequestStore: Send + Sync {
    /// Persist a new record. Fails with `DuplicateId` if the id exists.
    async fn put(&self, record: &VerificationRequest) -> StoreResult<()>;

    /// Fetch a record by id.
    async fn get(&self, id: &RequestId) -> StoreResult<Option<VerificationRequest>>;

    /// Atomically move a pending record to a terminal state.
    ///
    /// Returns whether this caller won the transition. `false` means the
    /// record was already terminal (or absent) — the caller lost the race
    /// and must not re-notify.
    async fn update_if_pending(
        &self,
        id: &RequestId,
        outcome: &TerminalOutcome,
    ) -> StoreResult<bool>;
}
