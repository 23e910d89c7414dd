//! Integration tests for the HTTP API surface.
//!
//! Drives the axum router directly (no socket) with the in-memory store
//! and mock collaborators, covering the four endpoints and the webhook's
//! form-encoded-single-key body format.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use veriflow::http::{router, AppState};
use veriflow::lifecycle::LifecycleController;
use veriflow::notify::MockNotifier;
use veriflow::prover::mock::MockProverSdk;
use veriflow::store::MemoryStore;

fn app() -> (Router, Arc<MockProverSdk>) {
    let sdk = Arc::new(MockProverSdk::new());
    let controller = Arc::new(LifecycleController::new(
        Arc::new(MemoryStore::new()),
        sdk.clone(),
        Arc::new(MockNotifier::new()),
        "https://verify.test",
        Duration::from_secs(60),
    ));
    (router(AppState { controller }), sdk)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn create_request(app: &Router) -> String {
    let request = Request::builder()
        .method("POST")
        .uri("/api/verifications")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({
                "target_email": "t@x.com",
                "sender_email": "s@x.com",
                "message": "please verify",
                "verification_type": "github",
            })
            .to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    body["id"].as_str().unwrap().to_string()
}

fn webhook_body(correlation_id: &str) -> String {
    let context = json!({
        "contextMessage": correlation_id,
        "extractedParameters": {"username": "alice"},
    });
    let payload = json!({
        "claimData": {"context": context.to_string()},
        "signatures": ["0xdeadbeef"],
    })
    .to_string();
    // The prover posts the payload as the single form key.
    serde_urlencoded::to_string([(payload.as_str(), "")]).unwrap()
}

#[tokio::test]
async fn create_then_poll_status() {
    let (app, _sdk) = app();
    let id = create_request(&app).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/verifications/status?id={id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["verification_type"], "github");
}

#[tokio::test]
async fn open_returns_request_url() {
    let (app, _sdk) = app();
    let id = create_request(&app).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/verifications/open?id={id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["data"]["request_url"]
        .as_str()
        .unwrap()
        .starts_with("https://"));
    assert_eq!(body["data"]["target_email"], "t@x.com");
}

#[tokio::test]
async fn unknown_id_is_404() {
    let (app, _sdk) = app();
    for path in [
        "/api/verifications/status?id=5bb33846-4ad2-4f27-8425-a38ecca77ecb",
        "/api/verifications/open?id=5bb33846-4ad2-4f27-8425-a38ecca77ecb",
    ] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn missing_id_is_400() {
    let (app, _sdk) = app();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/verifications/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_verification_type_is_400() {
    let (app, _sdk) = app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/verifications")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({
                "target_email": "t@x.com",
                "sender_email": "s@x.com",
                "verification_type": "twitter",
            })
            .to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn webhook_completes_the_request() {
    let (app, _sdk) = app();
    let id = create_request(&app).await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/prover/callback")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(webhook_body(&id)))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/verifications/status?id={id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], "completed");
    assert_eq!(body["data"]["extracted_parameters"]["username"], "alice");
}

#[tokio::test]
async fn webhook_with_unknown_correlation_is_404_and_generic() {
    let (app, _sdk) = app();
    create_request(&app).await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/prover/callback")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(webhook_body(
            "5bb33846-4ad2-4f27-8425-a38ecca77ecb",
        )))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    // No internal detail for the unauthenticated caller.
    assert_eq!(body["error"], "verification request not found");
}

#[tokio::test]
async fn webhook_with_rejected_proof_is_400() {
    let (app, sdk) = app();
    let id = create_request(&app).await;

    sdk.set_reject_proofs(true);
    let request = Request::builder()
        .method("POST")
        .uri("/api/prover/callback")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(webhook_body(&id)))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
