//! Proof verification and claim-context extraction.
//!
//! Two concerns, strictly ordered: `verify` checks the payload's
//! authenticity through the SDK (fail-closed), and only then may
//! `extract_context` output be trusted. The provider nests the claim
//! context as a JSON string inside the JSON payload; that double decode is
//! isolated here so callers never see raw strings twice.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::prover::traits::{ProverError, ProverResult, ProverSdk};

/// Decoded claim context: the correlation id the session was bound to and
/// the provider-extracted attributes (e.g. `{"username": "alice"}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimContext {
    /// Echo of the context message embedded at session build time.
    #[serde(rename = "contextMessage")]
    pub correlation_id: String,

    /// Attributes the provider extracted while generating the proof.
    /// Providers have emitted both spellings of this key.
    #[serde(
        rename = "extractedParameters",
        alias = "extractedParams",
        default
    )]
    pub extracted_parameters: BTreeMap<String, String>,
}

impl ClaimContext {
    /// Decode the claim context out of a raw proof payload.
    ///
    /// Expects `payload.claimData.context` to hold a JSON string which
    /// itself decodes to the context object. Any missing field or parse
    /// failure is `MalformedClaimContext`, distinct from a verification
    /// failure.
    pub fn from_payload(payload: &serde_json::Value) -> ProverResult<Self> {
        let context_str = payload
            .get("claimData")
            .and_then(|c| c.get("context"))
            .and_then(|c| c.as_str())
            .ok_or_else(|| {
                ProverError::MalformedClaimContext("missing claimData.context string".to_string())
            })?;

        let context: ClaimContext = serde_json::from_str(context_str).map_err(|e| {
            ProverError::MalformedClaimContext(format!("context does not decode: {e}"))
        })?;

        if context.correlation_id.is_empty() {
            return Err(ProverError::MalformedClaimContext(
                "empty contextMessage".to_string(),
            ));
        }

        Ok(context)
    }
}

/// Validates inbound proof payloads before anyone trusts them.
pub struct ProofVerifier {
    sdk: Arc<dyn ProverSdk>,
}

impl ProofVerifier {
    pub fn new(sdk: Arc<dyn ProverSdk>) -> Self {
        Self { sdk }
    }

    /// Check payload authenticity through the SDK.
    ///
    /// Fails closed: an SDK error is a verification failure, never a pass.
    /// The payload is identified in logs by digest, not content.
    pub async fn verify(&self, payload: &serde_json::Value) -> bool {
        match self.sdk.verify(payload).await {
            Ok(valid) => valid,
            Err(e) => {
                warn!(
                    payload_digest = %payload_digest(payload),
                    error = %e,
                    "proof verification errored; treating as invalid"
                );
                false
            }
        }
    }

    /// Decode the claim context. Only meaningful after `verify` passed.
    pub fn extract_context(&self, payload: &serde_json::Value) -> ProverResult<ClaimContext> {
        ClaimContext::from_payload(payload)
    }
}

/// Short SHA-256 digest of a payload, for log correlation without logging
/// claim content.
pub fn payload_digest(payload: &serde_json::Value) -> String {
    let bytes = serde_json::to_vec(payload).unwrap_or_default();
    let digest = Sha256::digest(&bytes);
    hex::encode(&digest[..8])
}
