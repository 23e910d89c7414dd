//! Notification sending.
//!
//! The core treats email as an external collaborator behind the
//! [`Notifier`] trait: send succeeds or fails, failures are logged by the
//! caller, never retried inline, and never fatal to the operation that
//! triggered them.

pub mod http;
pub mod mock;
pub mod templates;

use async_trait::async_trait;

pub use http::HttpNotifier;
pub use mock::MockNotifier;

/// One outbound email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: Option<String>,
}

/// Notification errors. Non-fatal to callers by contract.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("mail transport error: {0}")]
    Transport(String),

    #[error("mail rejected: {0}")]
    Rejected(String),
}

/// Notification sender seam.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, mail: &OutboundEmail) -> Result<(), NotifyError>;
}
