//! API request handlers.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::lifecycle::{LifecycleController, OpenView, PaymentConfirmation, StatusView};
use crate::request::RequestId;

use super::callback::decode_callback_body;
use super::error::ApiError;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<LifecycleController>,
}

#[derive(Serialize)]
pub struct CreateVerificationResponse {
    pub success: bool,
    pub id: RequestId,
}

#[derive(Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

#[derive(Serialize)]
pub struct OpenResponse {
    pub success: bool,
    pub data: OpenView,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub success: bool,
    pub data: StatusView,
}

#[derive(Serialize)]
pub struct CallbackResponse {
    pub success: bool,
    pub message: &'static str,
}

/// `POST /api/verifications` — create a request from a confirmed payment.
///
/// The body comes from the payment confirmation source and is trusted as
/// authenticated by the caller.
pub async fn create_verification(
    State(state): State<AppState>,
    Json(confirmation): Json<PaymentConfirmation>,
) -> Result<Json<CreateVerificationResponse>, ApiError> {
    let id = state.controller.create_request(confirmation).await?;
    Ok(Json(CreateVerificationResponse { success: true, id }))
}

fn parse_id_query(query: IdQuery) -> Result<RequestId, ApiError> {
    let id = query.id.ok_or(ApiError::MissingParameter("id"))?;
    // An id that cannot be a stored key behaves like an unknown one.
    RequestId::parse(&id).map_err(|_| ApiError::NotFound)
}

/// `GET /api/verifications/open?id=` — record projection plus the request
/// URL of the rehydrated prover session.
pub async fn open_verification(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<OpenResponse>, ApiError> {
    let id = parse_id_query(query)?;
    let data = state.controller.open_request(&id).await?;
    Ok(Json(OpenResponse {
        success: true,
        data,
    }))
}

/// `GET /api/verifications/status?id=` — idempotent status poll.
pub async fn verification_status(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<StatusResponse>, ApiError> {
    let id = parse_id_query(query)?;
    let data = state.controller.get_status(&id).await?;
    Ok(Json(StatusResponse {
        success: true,
        data,
    }))
}

/// `POST /api/prover/callback` — the prover's webhook.
///
/// Unauthenticated by design: the proof payload authenticates itself, and
/// the response never carries more than success/failure.
pub async fn prover_callback(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<CallbackResponse>, ApiError> {
    let raw_payload = decode_callback_body(&body).ok_or_else(|| {
        warn!("undecodable callback body");
        ApiError::InvalidProof
    })?;

    state.controller.ingest_callback(&raw_payload).await?;
    Ok(Json(CallbackResponse {
        success: true,
        message: "verification processed",
    }))
}
