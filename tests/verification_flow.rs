//! Integration test for the end-to-end verification lifecycle.
//!
//! Walks the complete flow against the in-memory store and mock
//! collaborators:
//! 1. Payment confirmed -> create request
//! 2. Status poll shows pending
//! 3. Target opens the link -> session rehydrated
//! 4. Prover callback arrives with a signed proof
//! 5. Status poll shows completed with extracted parameters
//! 6. Duplicate callback is an idempotent no-op

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use veriflow::lifecycle::{IngestOutcome, LifecycleController, LifecycleError, PaymentConfirmation};
use veriflow::notify::MockNotifier;
use veriflow::prover::mock::MockProverSdk;
use veriflow::request::{RequestId, VerificationStatus};
use veriflow::store::{MemoryStore, RequestStore};

const BASE_URL: &str = "https://verify.test";

struct Harness {
    controller: LifecycleController,
    store: MemoryStore,
    sdk: Arc<MockProverSdk>,
    notifier: MockNotifier,
}

fn harness() -> Harness {
    let store = MemoryStore::new();
    let sdk = Arc::new(MockProverSdk::new());
    let notifier = MockNotifier::new();
    let controller = LifecycleController::new(
        Arc::new(store.clone()),
        sdk.clone(),
        Arc::new(notifier.clone()),
        BASE_URL,
        Duration::from_secs(60),
    );
    Harness {
        controller,
        store,
        sdk,
        notifier,
    }
}

fn confirmation(verification_type: &str) -> PaymentConfirmation {
    PaymentConfirmation {
        target_email: "t@x.com".to_string(),
        sender_email: "s@x.com".to_string(),
        message: Some("please verify".to_string()),
        verification_type: verification_type.to_string(),
    }
}

/// A proof payload as the prover would deliver it: claim context nested as
/// a JSON string, with the correlation id echoed back.
fn proof_payload(correlation_id: &str) -> String {
    let context = json!({
        "contextAddress": "0x0",
        "contextMessage": correlation_id,
        "extractedParameters": {"username": "alice"},
    });
    json!({
        "claimData": {
            "provider": "http",
            "context": context.to_string(),
        },
        "signatures": ["0xdeadbeef"],
    })
    .to_string()
}

#[tokio::test]
async fn github_scenario_end_to_end() {
    let h = harness();

    let id = h.controller.create_request(confirmation("github")).await.unwrap();

    // Creation persisted a pending record and sent both notifications.
    let status = h.controller.get_status(&id).await.unwrap();
    assert_eq!(status.status, VerificationStatus::Pending);
    assert!(status.extracted_parameters.is_none());
    assert!(status.verified_at.is_none());
    let sent = h.notifier.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].to, "t@x.com");
    assert_eq!(sent[1].to, "s@x.com");

    // The target opens the link; the session comes from the stored
    // descriptor and is bound to the request id.
    let open = h.controller.open_request(&id).await.unwrap();
    assert_eq!(open.id, id);
    assert!(!open.request_url.is_empty());

    // The prover delivers the proof.
    let outcome = h.controller.ingest_callback(&proof_payload(id.as_str())).await.unwrap();
    assert_eq!(outcome, IngestOutcome::Completed);

    let status = h.controller.get_status(&id).await.unwrap();
    assert_eq!(status.status, VerificationStatus::Completed);
    assert!(status.verified_at.is_some());
    assert_eq!(
        status.extracted_parameters.unwrap()["username"],
        "alice"
    );

    // Completion mail went to the requester.
    let sent = h.notifier.sent();
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[2].to, "s@x.com");
    assert!(sent[2].text.contains("alice"));
}

#[tokio::test]
async fn every_known_type_creates_unique_pending_ids() {
    let h = harness();
    let mut ids = std::collections::HashSet::new();

    for vtype in ["github", "yc", "accredited_investor", "binance_kyc"] {
        let id = h.controller.create_request(confirmation(vtype)).await.unwrap();
        assert!(ids.insert(id.clone()), "duplicate id for {vtype}");
        let status = h.controller.get_status(&id).await.unwrap();
        assert_eq!(status.status, VerificationStatus::Pending);
    }
}

#[tokio::test]
async fn unknown_verification_type_persists_nothing() {
    let h = harness();

    let err = h.controller.create_request(confirmation("twitter")).await.unwrap_err();
    assert!(matches!(err, LifecycleError::InvalidVerificationType(_)));
    assert!(h.store.is_empty());
    assert!(h.sdk.created_sessions().is_empty());
    assert!(h.notifier.sent().is_empty());
}

#[tokio::test]
async fn open_and_status_on_unknown_id_fail_not_found() {
    let h = harness();
    let id = RequestId::generate();

    assert!(matches!(
        h.controller.open_request(&id).await.unwrap_err(),
        LifecycleError::NotFound
    ));
    assert!(matches!(
        h.controller.get_status(&id).await.unwrap_err(),
        LifecycleError::NotFound
    ));
}

#[tokio::test]
async fn rejected_proof_never_mutates_the_record() {
    let h = harness();
    let id = h.controller.create_request(confirmation("github")).await.unwrap();

    h.sdk.set_reject_proofs(true);
    let err = h.controller.ingest_callback(&proof_payload(id.as_str())).await.unwrap_err();
    assert!(matches!(err, LifecycleError::InvalidProof));

    let status = h.controller.get_status(&id).await.unwrap();
    assert_eq!(status.status, VerificationStatus::Pending);
    assert!(status.verified_at.is_none());
}

#[tokio::test]
async fn sdk_error_during_verify_fails_closed() {
    let h = harness();
    let id = h.controller.create_request(confirmation("github")).await.unwrap();

    h.sdk.set_verify_error(true);
    let err = h.controller.ingest_callback(&proof_payload(id.as_str())).await.unwrap_err();
    assert!(matches!(err, LifecycleError::InvalidProof));

    let status = h.controller.get_status(&id).await.unwrap();
    assert_eq!(status.status, VerificationStatus::Pending);
}

#[tokio::test]
async fn duplicate_callback_is_idempotent() {
    let h = harness();
    let id = h.controller.create_request(confirmation("github")).await.unwrap();
    let payload = proof_payload(id.as_str());

    assert_eq!(
        h.controller.ingest_callback(&payload).await.unwrap(),
        IngestOutcome::Completed
    );
    let first = h.controller.get_status(&id).await.unwrap();
    let mails_after_first = h.notifier.sent().len();

    // The prover retries delivery.
    assert_eq!(
        h.controller.ingest_callback(&payload).await.unwrap(),
        IngestOutcome::AlreadyTerminal
    );

    let second = h.controller.get_status(&id).await.unwrap();
    assert_eq!(second.status, VerificationStatus::Completed);
    assert_eq!(second.verified_at, first.verified_at);
    // No second completion notification.
    assert_eq!(h.notifier.sent().len(), mails_after_first);
}

#[tokio::test]
async fn callback_with_unknown_correlation_id_stores_nothing() {
    let h = harness();
    let id = h.controller.create_request(confirmation("github")).await.unwrap();

    let stray = RequestId::generate();
    let err = h.controller.ingest_callback(&proof_payload(stray.as_str())).await.unwrap_err();
    assert!(matches!(err, LifecycleError::NotFound));

    // The real record is untouched.
    let status = h.controller.get_status(&id).await.unwrap();
    assert_eq!(status.status, VerificationStatus::Pending);
    assert_eq!(h.store.len(), 1);
}

#[tokio::test]
async fn malformed_context_is_distinct_from_invalid_proof() {
    let h = harness();
    h.controller.create_request(confirmation("github")).await.unwrap();

    // Valid signature shape, but the nested context is not JSON.
    let payload = json!({
        "claimData": {"context": "not json"},
        "signatures": ["0xdeadbeef"],
    })
    .to_string();

    let err = h.controller.ingest_callback(&payload).await.unwrap_err();
    assert!(matches!(err, LifecycleError::MalformedClaimContext(_)));
}

#[tokio::test]
async fn non_uuid_correlation_id_is_malformed_context() {
    let h = harness();
    h.controller.create_request(confirmation("github")).await.unwrap();

    let err = h
        .controller
        .ingest_callback(&proof_payload("../../etc/passwd"))
        .await
        .unwrap_err();
    assert!(matches!(err, LifecycleError::MalformedClaimContext(_)));
}

#[tokio::test]
async fn notification_failure_does_not_roll_back_creation() {
    let h = harness();
    h.notifier.set_fail(true);

    let id = h.controller.create_request(confirmation("github")).await.unwrap();

    // Record exists and is retrievable despite both sends failing.
    let status = h.controller.get_status(&id).await.unwrap();
    assert_eq!(status.status, VerificationStatus::Pending);
}

#[tokio::test]
async fn notification_failure_does_not_undo_completion() {
    let h = harness();
    let id = h.controller.create_request(confirmation("github")).await.unwrap();

    h.notifier.set_fail(true);
    let outcome = h.controller.ingest_callback(&proof_payload(id.as_str())).await.unwrap();
    assert_eq!(outcome, IngestOutcome::Completed);

    let status = h.controller.get_status(&id).await.unwrap();
    assert_eq!(status.status, VerificationStatus::Completed);
}

#[tokio::test]
async fn concurrent_callbacks_complete_exactly_once() {
    let h = harness();
    let id = h.controller.create_request(confirmation("github")).await.unwrap();
    let payload = proof_payload(id.as_str());

    // Race duplicate deliveries through the store's conditional update.
    let store: Arc<dyn RequestStore> = Arc::new(h.store.clone());
    let outcome = veriflow::store::TerminalOutcome::Completed {
        result: serde_json::from_str(&payload).unwrap(),
        verified_at: 1,
    };
    let mut wins = 0;
    for _ in 0..4 {
        if store.update_if_pending(&id, &outcome).await.unwrap() {
            wins += 1;
        }
    }
    assert_eq!(wins, 1);
}
