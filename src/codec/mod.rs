//! The `codec` module defines the JSON wire envelope exchanged with clients
//! and the functions for decoding and encoding it.
//!
//! Decoding is strict: a frame that is not UTF-8 text, not JSON, or missing
//! any required field is rejected with a [`DecodeError`]. Rejection is a
//! per-frame event; callers decide what to do with the connection.

pub mod message;

pub use message::{InboundMessage, OutboundMessage};

use crate::utils::error::DecodeError;

/// Decodes a raw frame payload into an [`InboundMessage`].
///
/// Fails if the payload is not valid UTF-8, not valid JSON, or lacks any of
/// the required fields (`client_id`, `msg`, `created_at`) with the right types.
pub fn decode(bytes: &[u8]) -> Result<InboundMessage, DecodeError> {
    let text = std::str::from_utf8(bytes)?;
    let msg = serde_json::from_str(text)?;
    Ok(msg)
}

/// Encodes an [`OutboundMessage`] as a UTF-8 JSON byte vector.
///
/// The full field set is always emitted; nothing is omitted or defaulted.
pub fn encode(msg: &OutboundMessage) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(msg)
}
