//! HTTP transport layer.
//!
//! Four endpoints: create (fed by the payment confirmation source), open,
//! status, and the prover webhook. Everything else is the lifecycle
//! controller's business.

pub mod callback;
pub mod error;
pub mod handlers;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use server::{router, serve, ServerError};
