//! Verification request lifecycle.
//!
//! The controller owns every state transition of a verification request:
//! creation after a confirmed payment, session rehydration when the target
//! opens the link, callback ingestion when the prover delivers a proof, and
//! idempotent status polling.

pub mod controller;
pub mod error;

pub use controller::{
    IngestOutcome, LifecycleController, OpenView, PaymentConfirmation, StatusView,
};
pub use error::{LifecycleError, LifecycleResult};
