//! Mail-API-backed notifier.
//!
//! Posts JSON to a transactional mail API endpoint with a bearer token.
//! Transport mechanics are deliberately thin; everything the core cares
//! about is the success/failure result.

use async_trait::async_trait;
use serde::Serialize;
use zeroize::Zeroizing;

use super::{Notifier, NotifyError, OutboundEmail};

/// HTTP mail-API notifier.
pub struct HttpNotifier {
    client: reqwest::Client,
    api_url: String,
    token: Zeroizing<String>,
    from: String,
}

impl HttpNotifier {
    pub fn new(client: reqwest::Client, api_url: String, token: String, from: String) -> Self {
        Self {
            client,
            api_url,
            token: Zeroizing::new(token),
            from,
        }
    }
}

#[derive(Serialize)]
struct SendMailBody<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    html: Option<&'a str>,
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn send(&self, mail: &OutboundEmail) -> Result<(), NotifyError> {
        let body = SendMailBody {
            from: &self.from,
            to: &mail.to,
            subject: &mail.subject,
            text: &mail.text,
            html: mail.html.as_deref(),
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(self.token.as_str())
            .json(&body)
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NotifyError::Rejected(format!(
                "mail API returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}
