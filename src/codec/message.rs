use serde::{Deserialize, Serialize};

/// A message received from a client over the wire.
///
/// Clients stamp their own send time so the server can compute the
/// one-way latency at processing time.
///
/// # Fields
///
/// - `client_id` - Identifier chosen by the client for correlating replies.
/// - `msg` - The message body, opaque to the server.
/// - `created_at` - Client send time as Unix epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub client_id: String,
    pub msg: String,
    pub created_at: i64,
}

/// A message sent back to the client, carrying server-side latency metrics.
///
/// `msg_id` mirrors `client_id`; the original wire format populated it that
/// way and clients correlate on it, so it is kept as-is.
///
/// `server_latency` is `created_at - client_ts` and may be negative when the
/// client clock runs ahead of the server's. No skew correction is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub client_id: String,
    pub msg_id: String,
    pub msg: String,
    pub created_at: i64,
    pub client_ts: i64,
    pub server_latency: i64,
}
