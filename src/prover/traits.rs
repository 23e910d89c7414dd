//! Trait abstraction for the external proof-protocol SDK.
//!
//! The SDK is authoritative for cryptographic correctness; this module only
//! defines the seam the rest of the system talks through, so tests can run
//! against a mock and production against the HTTP client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::request::RequestId;

/// Context data embedded in a prover session.
///
/// The external protocol echoes this back verbatim inside any resulting
/// proof's claim context. `message` carries the correlation id — the sole
/// mechanism binding an anonymous callback to a stored record — and must
/// survive the round trip byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    #[serde(rename = "contextAddress")]
    pub address: String,

    #[serde(rename = "contextMessage")]
    pub message: String,
}

impl SessionContext {
    /// Bind a session context to a request id.
    ///
    /// The fixed `0x0` address matches the provider's context-binding call
    /// convention; only the message slot is meaningful to us.
    pub fn for_correlation(id: &RequestId) -> Self {
        Self {
            address: "0x0".to_string(),
            message: id.to_string(),
        }
    }
}

/// Serialized prover session configuration.
///
/// Persisted alongside the verification request so a live session can be
/// reconstructed later, by any process. Opaque to everything outside the
/// prover module: callers must not depend on its shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescriptor {
    pub session_id: String,
    pub app_id: String,
    pub template_id: String,
    pub callback_url: String,
    pub context: SessionContext,
    pub request_url: String,
}

/// A reconstructed, interactive prover session.
///
/// Carries what the open flow needs to show the target party: the request
/// URL (rendered as a link or QR code client-side) and the correlation id
/// the session is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveSession {
    pub request_url: String,
    pub correlation_id: String,
}

/// Result type for prover operations.
pub type ProverResult<T> = Result<T, ProverError>;

/// Prover SDK errors.
#[derive(Debug, thiserror::Error)]
pub enum ProverError {
    /// Session negotiation with the provider failed.
    #[error("prover session error: {0}")]
    Session(String),

    /// Transport-level failure talking to the provider.
    #[error("prover transport error: {0}")]
    Transport(String),

    /// The proof payload failed the integrity check.
    #[error("invalid proof")]
    InvalidProof,

    /// The claim's nested context field did not decode. Distinct from
    /// `InvalidProof`: the signature may be fine while the context is not.
    #[error("malformed claim context: {0}")]
    MalformedClaimContext(String),
}

/// Trait abstraction for the external proof-protocol SDK.
///
/// Mirrors the SDK surface: session construction with embedded context and
/// callback URL, session start from a persisted descriptor, and proof
/// verification.
#[async_trait]
pub trait ProverSdk: Send + Sync {
    /// Construct a session descriptor scoped to one provider template, with
    /// `context` embedded for echo-back and `callback_url` set as the
    /// address the provider will POST results to.
    async fn create_session(
        &self,
        template_id: &str,
        context: &SessionContext,
        callback_url: &str,
    ) -> ProverResult<SessionDescriptor>;

    /// Reconstruct and start an interactive session from a persisted
    /// descriptor. Must tolerate descriptors produced by a prior process.
    async fn start_session(&self, descriptor: &SessionDescriptor) -> ProverResult<LiveSession>;

    /// Check the authenticity of an inbound proof payload.
    ///
    /// `Ok(true)` means the provider's signature/integrity check passed.
    /// Claim content must never be trusted before that.
    async fn verify(&self, payload: &serde_json::Value) -> ProverResult<bool>;
}
