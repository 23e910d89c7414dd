//! HTTP client for the prover service's REST API.
//!
//! Production implementation of [`ProverSdk`]. The prover service owns the
//! cryptography; this client only moves descriptors and payloads across the
//! wire. Requests authenticate with the application secret as a bearer
//! token; the secret is zeroized on drop.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::traits::*;

/// HTTP-backed prover SDK.
pub struct HttpProverSdk {
    client: reqwest::Client,
    base_url: String,
    app_id: String,
    secret: Zeroizing<String>,
}

impl HttpProverSdk {
    pub fn new(client: reqwest::Client, base_url: String, app_id: String, secret: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            app_id,
            secret: Zeroizing::new(secret),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[derive(Serialize)]
struct CreateSessionBody<'a> {
    app_id: &'a str,
    template_id: &'a str,
    context: &'a SessionContext,
    callback_url: &'a str,
}

#[derive(Deserialize)]
struct CreateSessionResponse {
    session_id: String,
    request_url: String,
}

#[derive(Deserialize)]
struct StartSessionResponse {
    request_url: String,
}

#[derive(Deserialize)]
struct VerifyResponse {
    valid: bool,
}

#[async_trait]
impl ProverSdk for HttpProverSdk {
    async fn create_session(
        &self,
        template_id: &str,
        context: &SessionContext,
        callback_url: &str,
    ) -> ProverResult<SessionDescriptor> {
        let body = CreateSessionBody {
            app_id: &self.app_id,
            template_id,
            context,
            callback_url,
        };

        let response = self
            .client
            .post(self.url("/v1/sessions"))
            .bearer_auth(self.secret.as_str())
            .json(&body)
            .send()
            .await
            .map_err(|e| ProverError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ProverError::Session(format!(
                "session creation returned {}",
                response.status()
            )));
        }

        let created: CreateSessionResponse = response
            .json()
            .await
            .map_err(|e| ProverError::Session(format!("session response malformed: {e}")))?;

        Ok(SessionDescriptor {
            session_id: created.session_id,
            app_id: self.app_id.clone(),
            template_id: template_id.to_string(),
            callback_url: callback_url.to_string(),
            context: context.clone(),
            request_url: created.request_url,
        })
    }

    async fn start_session(&self, descriptor: &SessionDescriptor) -> ProverResult<LiveSession> {
        let response = self
            .client
            .post(self.url(&format!("/v1/sessions/{}/start", descriptor.session_id)))
            .bearer_auth(self.secret.as_str())
            .json(descriptor)
            .send()
            .await
            .map_err(|e| ProverError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ProverError::Session(format!(
                "session start returned {}",
                response.status()
            )));
        }

        let started: StartSessionResponse = response
            .json()
            .await
            .map_err(|e| ProverError::Session(format!("start response malformed: {e}")))?;

        Ok(LiveSession {
            request_url: started.request_url,
            correlation_id: descriptor.context.message.clone(),
        })
    }

    async fn verify(&self, payload: &serde_json::Value) -> ProverResult<bool> {
        let response = self
            .client
            .post(self.url("/v1/proofs/verify"))
            .bearer_auth(self.secret.as_str())
            .json(payload)
            .send()
            .await
            .map_err(|e| ProverError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ProverError::Transport(format!(
                "verify endpoint returned {}",
                response.status()
            )));
        }

        let verdict: VerifyResponse = response
            .json()
            .await
            .map_err(|e| ProverError::Transport(format!("verify response malformed: {e}")))?;

        Ok(verdict.valid)
    }
}
