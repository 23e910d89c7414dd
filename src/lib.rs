//! Veriflow - Payment-gated credential verification requests
//!
//! A requester pays once to ask a target person to prove a credential
//! (GitHub identity, YC alum status, accredited-investor status, exchange
//! KYC) through an external zero-knowledge proof protocol; the verified
//! result goes back to the requester by email.
//!
//! Key principles:
//! - One durable record per request, keyed by an opaque id
//! - Status only ever moves pending -> completed/failed, never backward
//! - The callback path is the sole mutation entry point and is idempotent
//!   under at-least-once webhook delivery
//! - Proof payloads are never trusted before the SDK integrity check;
//!   verification fails closed
//! - Notifications are best-effort: logged on failure, never a rollback

pub mod cache;
pub mod http;
pub mod lifecycle;
pub mod notify;
pub mod prover;
pub mod request;
pub mod store;
