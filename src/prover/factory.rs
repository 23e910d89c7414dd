//! Proof session factory.
//!
//! Wraps the SDK to build provider session descriptors bound to a
//! correlation id and the service's callback URL, and to rehydrate live
//! sessions from persisted descriptors.

use std::sync::Arc;

use crate::prover::traits::{LiveSession, ProverResult, ProverSdk, SessionContext, SessionDescriptor};
use crate::request::RequestId;

/// Builds and rehydrates prover sessions.
pub struct SessionFactory {
    sdk: Arc<dyn ProverSdk>,
    callback_url: String,
}

impl SessionFactory {
    /// `callback_url` is the fixed external address the provider POSTs
    /// proofs to; every session this factory builds carries it.
    pub fn new(sdk: Arc<dyn ProverSdk>, callback_url: String) -> Self {
        Self { sdk, callback_url }
    }

    /// Build a session descriptor for one provider template, with
    /// `correlation_id` embedded as echo-back context.
    pub async fn build(
        &self,
        template_id: &str,
        correlation_id: &RequestId,
    ) -> ProverResult<SessionDescriptor> {
        let context = SessionContext::for_correlation(correlation_id);
        self.sdk
            .create_session(template_id, &context, &self.callback_url)
            .await
    }

    /// Reconstruct a live session from a persisted descriptor.
    pub async fn rehydrate(&self, descriptor: &SessionDescriptor) -> ProverResult<LiveSession> {
        self.sdk.start_session(descriptor).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prover::mock::MockProverSdk;

    #[tokio::test]
    async fn build_embeds_correlation_id_and_callback_url() {
        let sdk = Arc::new(MockProverSdk::new());
        let factory = SessionFactory::new(sdk, "https://svc.test/api/prover/callback".into());

        let id = RequestId::generate();
        let descriptor = factory.build("template-a", &id).await.unwrap();

        assert_eq!(descriptor.context.message, id.to_string());
        assert_eq!(descriptor.callback_url, "https://svc.test/api/prover/callback");
        assert_eq!(descriptor.template_id, "template-a");
    }

    #[tokio::test]
    async fn rehydrate_round_trips_correlation_id_through_serialization() {
        let sdk = Arc::new(MockProverSdk::new());
        let factory = SessionFactory::new(sdk, "https://svc.test/cb".into());

        let id = RequestId::generate();
        let descriptor = factory.build("template-a", &id).await.unwrap();

        // Persist and reload, as the open flow does in a later process.
        let json = serde_json::to_string(&descriptor).unwrap();
        let reloaded: SessionDescriptor = serde_json::from_str(&json).unwrap();

        let session = factory.rehydrate(&reloaded).await.unwrap();
        assert_eq!(session.correlation_id, id.to_string());
        assert!(!session.request_url.is_empty());
    }
}
