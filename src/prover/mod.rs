//! External proof-protocol integration.
//!
//! - `traits`: the SDK seam and descriptor/session types
//! - `factory`: builds and rehydrates prover sessions
//! - `verifier`: payload authenticity check and claim-context extraction
//! - `http`: production SDK client; `mock`: test double

pub mod factory;
pub mod http;
pub mod mock;
pub mod traits;
pub mod verifier;

pub use factory::SessionFactory;
pub use http::HttpProverSdk;
pub use traits::{
    LiveSession, ProverError, ProverResult, ProverSdk, SessionContext, SessionDescriptor,
};
pub use verifier::{ClaimContext, ProofVerifier};
