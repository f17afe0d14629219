//! The `amplifier` module turns one decoded inbound message into a batch of
//! outbound messages carrying server-side latency metrics.
//!
//! Amplification is pure computation: no I/O, no shared state. Every
//! connection handler can call it concurrently without coordination.

use crate::codec::{InboundMessage, OutboundMessage};

/// Produces `factor` outbound copies of `inbound`, each stamped with the
/// same server time `now` (epoch millis).
///
/// `server_latency` is `now - inbound.created_at`, a signed value; a client
/// whose clock runs ahead of the server yields a negative latency, which is
/// reported as-is.
///
/// `now` is captured once by the caller, not per copy, so all messages of a
/// batch carry identical timestamps.
pub fn amplify(inbound: &InboundMessage, factor: usize, now: i64) -> Vec<OutboundMessage> {
    let latency = now - inbound.created_at;
    (0..factor)
        .map(|_| OutboundMessage {
            client_id: inbound.client_id.clone(),
            // Mirrors client_id; see OutboundMessage docs.
            msg_id: inbound.client_id.clone(),
            msg: inbound.msg.clone(),
            created_at: now,
            client_ts: inbound.created_at,
            server_latency: latency,
        })
        .collect()
}

#[cfg(test)]
mod tests;
