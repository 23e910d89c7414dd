//! Verification request entity and its enumerations.
//!
//! A `VerificationRequest` is the sole durable entity of the system: one
//! record per paid verification request, keyed by an opaque `RequestId`.
//! Records are created once, mutated exactly once (pending -> terminal by
//! the callback-ingestion path), and never deleted by this subsystem.

use crate::prover::SessionDescriptor;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Opaque unique identifier of a verification request.
///
/// Generated at creation, immutable, and the only external handle to the
/// record. The same value doubles as the correlation id embedded in the
/// prover session context, which the external protocol must echo back
/// verbatim inside any resulting proof.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a fresh unique id (UUIDv4).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Defensive parse for ids recovered from untrusted input (the claim
    /// context of an anonymous callback). Rejects anything that is not a
    /// UUID so a mangled context cannot address arbitrary store keys.
    pub fn parse(s: &str) -> Result<Self, InvalidRequestId> {
        let parsed = Uuid::parse_str(s).map_err(|_| InvalidRequestId(s.to_string()))?;
        Ok(Self(parsed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error for text that does not parse as a request id.
#[derive(Debug, Clone, thiserror::Error)]
#[error("not a valid request id: {0:?}")]
pub struct InvalidRequestId(pub String);

/// The credential a proof request targets.
///
/// Each variant maps to a fixed provider template on the external proof
/// protocol. Unknown values are rejected at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationType {
    Github,
    Yc,
    AccreditedInvestor,
    BinanceKyc,
}

impl VerificationType {
    pub const ALL: &'static [VerificationType] = &[
        VerificationType::Github,
        VerificationType::Yc,
        VerificationType::AccreditedInvestor,
        VerificationType::BinanceKyc,
    ];

    /// Parse the snake_case wire name. Returns `None` for unknown types.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "github" => Some(VerificationType::Github),
            "yc" => Some(VerificationType::Yc),
            "accredited_investor" => Some(VerificationType::AccreditedInvestor),
            "binance_kyc" => Some(VerificationType::BinanceKyc),
            _ => None,
        }
    }

    /// Wire name (snake_case), the inverse of [`parse`](Self::parse).
    pub fn name(&self) -> &'static str {
        match self {
            VerificationType::Github => "github",
            VerificationType::Yc => "yc",
            VerificationType::AccreditedInvestor => "accredited_investor",
            VerificationType::BinanceKyc => "binance_kyc",
        }
    }

    /// Provider template id on the external proof protocol.
    pub fn template_id(&self) -> &'static str {
        match self {
            VerificationType::Github => "6d3f6753-7ee6-49ee-a545-62f1b1822ae5",
            VerificationType::Yc => "a4c9fb77-6a4b-40ee-a850-98e4d41a89a6",
            VerificationType::AccreditedInvestor => "3bfad093-4da8-44d6-a362-123750a70d40",
            VerificationType::BinanceKyc => "2b22db5c-78d9-4d82-84f0-a9e0a4ed0470",
        }
    }

    /// Human-readable phrasing used in notification bodies:
    /// "{sender} is requesting to verify {describe()}".
    pub fn describe(&self) -> &'static str {
        match self {
            VerificationType::Github => "your GitHub username",
            VerificationType::Yc => "if you are a Y Combinator alum",
            VerificationType::AccreditedInvestor => "if you are an accredited investor in USA",
            VerificationType::BinanceKyc => "if you are a Binance KYC'd user",
        }
    }
}

/// Verification request status.
///
/// Transitions only pending -> completed or pending -> failed, never
/// backward. The `failed` arm is part of the enumerated contract for
/// provider-reported rejection; no code path currently triggers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Pending,
    Completed,
    Failed,
}

impl VerificationStatus {
    /// Terminal states accept no further mutation.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, VerificationStatus::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Pending => "pending",
            VerificationStatus::Completed => "completed",
            VerificationStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(VerificationStatus::Pending),
            "completed" => Some(VerificationStatus::Completed),
            "failed" => Some(VerificationStatus::Failed),
            _ => None,
        }
    }
}

/// One verification request record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationRequest {
    /// Opaque unique id; immutable once assigned.
    pub id: RequestId,

    /// Serialized prover session configuration, required to reconstruct a
    /// live session later. Opaque to everything but the prover module.
    pub descriptor: SessionDescriptor,

    /// Who is asked to prove the credential.
    pub target_email: String,

    /// Who asked (and receives the result).
    pub sender_email: String,

    /// Optional free-form message, echoed verbatim to both parties.
    pub message: Option<String>,

    pub verification_type: VerificationType,

    pub status: VerificationStatus,

    /// Raw proof payload, set together with `verified_at` exactly once by
    /// the callback-ingestion path; absent otherwise.
    pub result: Option<serde_json::Value>,

    /// Unix seconds.
    pub created_at: u64,

    /// Unix seconds; set only on completion.
    pub verified_at: Option<u64>,
}

impl VerificationRequest {
    /// Create a fresh pending record.
    pub fn new(
        id: RequestId,
        descriptor: SessionDescriptor,
        target_email: String,
        sender_email: String,
        message: Option<String>,
        verification_type: VerificationType,
    ) -> Self {
        Self {
            id,
            descriptor,
            target_email,
            sender_email,
            message,
            verification_type,
            status: VerificationStatus::Pending,
            result: None,
            created_at: now_secs(),
            verified_at: None,
        }
    }
}

/// Current unix time in seconds.
pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
