//! Verification lifecycle controller.
//!
//! All operations are short-lived request/response handlers; the
//! interactive proof negotiation happens out of process between the
//! target's device and the provider. The only mutation entry point is
//! [`LifecycleController::ingest_callback`], and it is safe under
//! at-least-once webhook delivery: re-delivery to a terminal record is a
//! successful no-op, and the store's conditional update guarantees a single
//! winner when duplicates race.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cache::TtlCache;
use crate::notify::{templates, Notifier};
use crate::prover::verifier::payload_digest;
use crate::prover::{ClaimContext, LiveSession, ProofVerifier, ProverSdk, SessionFactory};
use crate::request::{now_secs, RequestId, VerificationRequest, VerificationStatus, VerificationType};
use crate::store::{RequestStore, TerminalOutcome};

use super::error::{LifecycleError, LifecycleResult};

/// Input from the payment confirmation source.
///
/// Trusted as already authenticated by the caller; the payment flow itself
/// is outside this subsystem.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfirmation {
    pub target_email: String,
    pub sender_email: String,
    #[serde(default)]
    pub message: Option<String>,
    pub verification_type: String,
}

/// Projection returned to whoever opens a verification link.
///
/// Carries what the open page needs: request context plus the rehydrated
/// session's request URL. The descriptor itself never leaves the core.
#[derive(Debug, Clone, Serialize)]
pub struct OpenView {
    pub id: RequestId,
    pub verification_type: VerificationType,
    pub description: &'static str,
    pub target_email: String,
    pub sender_email: String,
    pub message: Option<String>,
    pub status: VerificationStatus,
    pub created_at: u64,
    pub request_url: String,
}

/// Projection returned by status polling.
#[derive(Debug, Clone, Serialize)]
pub struct StatusView {
    pub id: RequestId,
    pub status: VerificationStatus,
    pub verification_type: VerificationType,
    pub target_email: String,
    pub sender_email: String,
    pub message: Option<String>,
    pub created_at: u64,
    pub verified_at: Option<u64>,
    /// Provider-extracted attributes; present only once completed.
    pub extracted_parameters: Option<BTreeMap<String, String>>,
}

/// Outcome of callback ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// This delivery won the pending -> completed transition.
    Completed,
    /// The record was already terminal; idempotent no-op.
    AlreadyTerminal,
}

/// Orchestrates creation, open, callback ingestion and status polling.
pub struct LifecycleController {
    store: Arc<dyn RequestStore>,
    factory: SessionFactory,
    verifier: ProofVerifier,
    notifier: Arc<dyn Notifier>,
    base_url: String,
    sessions: TtlCache<RequestId, LiveSession>,
}

impl LifecycleController {
    /// `public_base_url` is the externally reachable base of this service;
    /// the prover callback URL and the links in notification mails derive
    /// from it. `session_ttl` bounds how long a rehydrated session is
    /// served from cache.
    pub fn new(
        store: Arc<dyn RequestStore>,
        sdk: Arc<dyn ProverSdk>,
        notifier: Arc<dyn Notifier>,
        public_base_url: &str,
        session_ttl: Duration,
    ) -> Self {
        let base_url = public_base_url.trim_end_matches('/').to_string();
        let callback_url = format!("{base_url}/api/prover/callback");
        Self {
            store,
            factory: SessionFactory::new(sdk.clone(), callback_url),
            verifier: ProofVerifier::new(sdk),
            notifier,
            base_url,
            sessions: TtlCache::new(session_ttl),
        }
    }

    /// Create a verification request after a confirmed payment.
    ///
    /// Persists the record first; the two notifications (target:
    /// request-to-verify, sender: confirmation) are best-effort and never
    /// roll back the created record.
    pub async fn create_request(
        &self,
        confirmation: PaymentConfirmation,
    ) -> LifecycleResult<RequestId> {
        let verification_type = VerificationType::parse(&confirmation.verification_type)
            .ok_or_else(|| {
                LifecycleError::InvalidVerificationType(confirmation.verification_type.clone())
            })?;

        let id = RequestId::generate();
        let descriptor = self
            .factory
            .build(verification_type.template_id(), &id)
            .await?;

        let record = VerificationRequest::new(
            id.clone(),
            descriptor,
            confirmation.target_email,
            confirmation.sender_email,
            confirmation.message,
            verification_type,
        );
        self.store.put(&record).await?;
        info!(id = %id, verification_type = verification_type.name(), "verification request created");

        let open_url = format!("{}/open?id={}", self.base_url, id);
        let status_url = format!("{}/status?id={}", self.base_url, id);

        let to_target = templates::verification_requested(
            &record.target_email,
            &record.sender_email,
            verification_type.describe(),
            record.message.as_deref(),
            &open_url,
        );
        if let Err(e) = self.notifier.send(&to_target).await {
            warn!(id = %id, error = %e, "request notification to target failed");
        }

        let to_sender = templates::request_submitted(
            &record.sender_email,
            &record.target_email,
            verification_type.describe(),
            record.message.as_deref(),
            &status_url,
        );
        if let Err(e) = self.notifier.send(&to_sender).await {
            warn!(id = %id, error = %e, "confirmation notification to sender failed");
        }

        Ok(id)
    }

    /// Open a verification request: load the record and reconstruct a live
    /// prover session from its persisted descriptor.
    pub async fn open_request(&self, id: &RequestId) -> LifecycleResult<OpenView> {
        let record = self
            .store
            .get(id)
            .await?
            .ok_or(LifecycleError::NotFound)?;

        let session = match self.sessions.get(id) {
            Some(session) => session,
            None => {
                let session = self.factory.rehydrate(&record.descriptor).await?;
                self.sessions.set(id.clone(), session.clone());
                session
            }
        };

        Ok(OpenView {
            id: record.id,
            verification_type: record.verification_type,
            description: record.verification_type.describe(),
            target_email: record.target_email,
            sender_email: record.sender_email,
            message: record.message,
            status: record.status,
            created_at: record.created_at,
            request_url: session.request_url,
        })
    }

    /// Ingest a prover callback carrying a raw proof payload.
    ///
    /// Verify first, trust nothing before that; then bind the proof to the
    /// stored record through the correlation id echoed back in the claim
    /// context. Only the winner of the conditional terminal write sends the
    /// completion notification.
    pub async fn ingest_callback(&self, raw_payload: &str) -> LifecycleResult<IngestOutcome> {
        let payload: serde_json::Value =
            serde_json::from_str(raw_payload).map_err(|_| LifecycleError::InvalidProof)?;

        if !self.verifier.verify(&payload).await {
            warn!(payload_digest = %payload_digest(&payload), "rejected proof payload");
            return Err(LifecycleError::InvalidProof);
        }

        let context = self.verifier.extract_context(&payload)?;
        let id = RequestId::parse(&context.correlation_id).map_err(|_| {
            LifecycleError::MalformedClaimContext(
                "correlation id is not a valid request id".to_string(),
            )
        })?;

        let record = self
            .store
            .get(&id)
            .await?
            .ok_or(LifecycleError::NotFound)?;

        if record.status.is_terminal() {
            debug!(id = %id, status = record.status.as_str(), "duplicate callback for terminal record");
            return Ok(IngestOutcome::AlreadyTerminal);
        }

        let outcome = TerminalOutcome::Completed {
            result: payload,
            verified_at: now_secs(),
        };
        if !self.store.update_if_pending(&id, &outcome).await? {
            // A concurrent delivery won the transition.
            debug!(id = %id, "lost callback race; treating as no-op");
            return Ok(IngestOutcome::AlreadyTerminal);
        }
        info!(id = %id, "verification completed");

        let status_url = format!("{}/status?id={}", self.base_url, id);
        let mail = templates::verification_completed(
            &record.sender_email,
            &record.target_email,
            record.message.as_deref(),
            &context.extracted_parameters,
            &status_url,
        );
        if let Err(e) = self.notifier.send(&mail).await {
            warn!(id = %id, error = %e, "completion notification failed");
        }

        Ok(IngestOutcome::Completed)
    }

    /// Current state of a request. Pure read; safe to poll.
    pub async fn get_status(&self, id: &RequestId) -> LifecycleResult<StatusView> {
        let record = self
            .store
            .get(id)
            .await?
            .ok_or(LifecycleError::NotFound)?;

        // The stored result was context-validated at ingest time; a decode
        // failure here means corruption, not caller error.
        let extracted_parameters = record
            .result
            .as_ref()
            .and_then(|payload| ClaimContext::from_payload(payload).ok())
            .map(|ctx| ctx.extracted_parameters);

        Ok(StatusView {
            id: record.id,
            status: record.status,
            verification_type: record.verification_type,
            target_email: record.target_email,
            sender_email: record.sender_email,
            message: record.message,
            created_at: record.created_at,
            verified_at: record.verified_at,
            extracted_parameters,
        })
    }
}
