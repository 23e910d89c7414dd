//! Lifecycle error taxonomy.

use crate::prover::ProverError;
use crate::store::StoreError;

/// Result type for lifecycle operations.
pub type LifecycleResult<T> = Result<T, LifecycleError>;

/// Lifecycle errors.
///
/// Validation errors carry a descriptive message for the caller; store and
/// session errors surface generically at the transport layer while the
/// detail is logged internally. Notification failure is deliberately absent:
/// it is logged, not propagated.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("unknown verification type: {0:?}")]
    InvalidVerificationType(String),

    #[error("verification request not found")]
    NotFound,

    #[error("invalid proof")]
    InvalidProof,

    #[error("malformed claim context: {0}")]
    MalformedClaimContext(String),

    #[error("prover session error: {0}")]
    Session(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl From<ProverError> for LifecycleError {
    fn from(e: ProverError) -> Self {
        match e {
            ProverError::InvalidProof => LifecycleError::InvalidProof,
            ProverError::MalformedClaimContext(msg) => LifecycleError::MalformedClaimContext(msg),
            ProverError::Session(msg) | ProverError::Transport(msg) => {
                LifecycleError::Session(msg)
            }
        }
    }
}
