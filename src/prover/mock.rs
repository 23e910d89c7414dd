//! Mock prover SDK for testing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use super::traits::*;

/// Mock prover SDK for testing.
///
/// Builds deterministic descriptors, records every session it creates, and
/// lets tests force verification outcomes.
#[derive(Clone)]
pub struct MockProverSdk {
    sessions: Arc<Mutex<Vec<SessionDescriptor>>>,
    reject_proofs: Arc<AtomicBool>,
    verify_error: Arc<AtomicBool>,
}

impl MockProverSdk {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(Mutex::new(Vec::new())),
            reject_proofs: Arc::new(AtomicBool::new(false)),
            verify_error: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Make `verify` return false for every payload.
    pub fn set_reject_proofs(&self, reject: bool) {
        self.reject_proofs.store(reject, Ordering::SeqCst);
    }

    /// Make `verify` return an error (exercises the fail-closed path).
    pub fn set_verify_error(&self, fail: bool) {
        self.verify_error.store(fail, Ordering::SeqCst);
    }

    /// Sessions created so far (for test assertions).
    pub fn created_sessions(&self) -> Vec<SessionDescriptor> {
        self.sessions.lock().unwrap().clone()
    }
}

impl Default for MockProverSdk {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProverSdk for MockProverSdk {
    async fn create_session(
        &self,
        template_id: &str,
        context: &SessionContext,
        callback_url: &str,
    ) -> ProverResult<SessionDescriptor> {
        let session_id = Uuid::new_v4().to_string();
        let descriptor = SessionDescriptor {
            request_url: format!("https://mock.prover.test/session/{session_id}"),
            session_id,
            app_id: "mock-app".to_string(),
            template_id: template_id.to_string(),
            callback_url: callback_url.to_string(),
            context: context.clone(),
        };
        self.sessions.lock().unwrap().push(descriptor.clone());
        Ok(descriptor)
    }

    async fn start_session(&self, descriptor: &SessionDescriptor) -> ProverResult<LiveSession> {
        Ok(LiveSession {
            request_url: descriptor.request_url.clone(),
            correlation_id: descriptor.context.message.clone(),
        })
    }

    async fn verify(&self, payload: &serde_json::Value) -> ProverResult<bool> {
        if self.verify_error.load(Ordering::SeqCst) {
            return Err(ProverError::Transport("mock verify error".to_string()));
        }
        if self.reject_proofs.load(Ordering::SeqCst) {
            return Ok(false);
        }
        // A plausible payload needs claim data and at least one signature.
        let has_claim = payload.get("claimData").is_some();
        let has_signature = payload
            .get("signatures")
            .and_then(|s| s.as_array())
            .map(|s| !s.is_empty())
            .unwrap_or(false);
        Ok(has_claim && has_signature)
    }
}
