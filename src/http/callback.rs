//! Decoding of the prover's webhook body format.
//!
//! The external prover POSTs a form-encoded body whose SINGLE KEY is the
//! raw JSON payload string (not a JSON request body). Form decoding splits
//! at the first unencoded `=`, which can land inside the payload, so the
//! key and value are rejoined before use. This shape must be preserved for
//! compatibility with the prover's webhook format.

use std::collections::BTreeMap;

/// Recover the raw JSON payload from a form-encoded webhook body.
///
/// Returns `None` for an empty or undecodable body.
pub fn decode_callback_body(body: &str) -> Option<String> {
    let pairs: BTreeMap<String, String> = serde_urlencoded::from_str(body).ok()?;
    let (key, value) = pairs.into_iter().next()?;
    if key.is_empty() {
        return None;
    }
    // An unencoded '=' inside the payload split it into key and value;
    // rejoining restores the original text exactly.
    if value.is_empty() {
        Some(key)
    } else {
        Some(format!("{key}={value}"))
    }
}
