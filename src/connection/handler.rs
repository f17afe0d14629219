use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};
use tungstenite::protocol::Message as WsMessage;

use crate::amplifier::amplify;
use crate::codec;
use crate::config::AmplifierSettings;

/// Lifecycle of a connection. There is no reconnection; a handler that
/// reaches `Closed` is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnState {
    Open,
    Closing,
    Closed,
}

/// Outcome of enqueueing one outbound frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendResult {
    /// Frame accepted into the outbound buffer.
    Sent,
    /// Frame dropped because the outbound buffer is at its ceiling.
    /// The connection stays open; dropping never escalates to a close.
    Backpressured,
    /// Frame dropped because the connection is no longer open.
    Dropped,
}

/// Per-connection state machine wiring inbound frames to the amplifier and
/// outbound frames to the socket's writer task.
///
/// The handler owns the sending half of the connection's outbound channel;
/// the writer task owns the receiving half and decrements `buffered` as it
/// drains frames onto the socket. The handler refuses to enqueue past the
/// configured ceiling, so the channel never holds more than
/// `max_backpressure_bytes` of payload.
#[derive(Debug)]
pub struct ConnectionHandler {
    id: String,
    factor: usize,
    max_backpressure_bytes: usize,
    state: ConnState,
    outbound: UnboundedSender<WsMessage>,
    buffered: Arc<AtomicUsize>,
    decode_failures: u64,
}

impl ConnectionHandler {
    pub fn new(
        id: String,
        settings: &AmplifierSettings,
        outbound: UnboundedSender<WsMessage>,
        buffered: Arc<AtomicUsize>,
    ) -> Self {
        Self {
            id,
            factor: settings.factor,
            max_backpressure_bytes: settings.max_backpressure_bytes,
            state: ConnState::Open,
            outbound,
            buffered,
            decode_failures: 0,
        }
    }

    /// Processes one raw frame from the peer.
    ///
    /// A frame that fails to decode is dropped and counted; the connection
    /// stays open. A frame that decodes is amplified `factor` times and each
    /// copy is enqueued in generation order, mirroring the inbound frame's
    /// binary flag. `now` is the server receive time in epoch millis,
    /// captured once for the whole batch.
    pub fn handle_frame(&mut self, payload: &[u8], binary: bool, now: i64) {
        if self.state != ConnState::Open {
            return;
        }

        let inbound = match codec::decode(payload) {
            Ok(msg) => msg,
            Err(e) => {
                self.decode_failures += 1;
                warn!(conn = %self.id, "dropping undecodable frame: {}", e);
                return;
            }
        };

        debug!(conn = %self.id, latency = now - inbound.created_at, "amplifying frame");

        for out in amplify(&inbound, self.factor, now) {
            let bytes = match codec::encode(&out) {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(conn = %self.id, "failed to serialize reply: {}", e);
                    continue;
                }
            };
            let frame = match into_frame(bytes, binary) {
                Some(frame) => frame,
                None => continue,
            };
            if self.send(frame) == SendResult::Backpressured {
                warn!(conn = %self.id, "outbound buffer full, dropping reply");
            }
        }
    }

    /// Enqueues one frame for the writer task.
    ///
    /// Policy: never block, never close. A frame that would push the
    /// buffered byte count past the ceiling is dropped and reported as
    /// `Backpressured`; the connection keeps serving.
    pub fn send(&mut self, frame: WsMessage) -> SendResult {
        if self.state != ConnState::Open {
            return SendResult::Dropped;
        }

        let len = frame.len();
        if self.buffered.load(Ordering::Acquire) + len > self.max_backpressure_bytes {
            return SendResult::Backpressured;
        }

        self.buffered.fetch_add(len, Ordering::AcqRel);
        if self.outbound.send(frame).is_err() {
            // Writer task is gone; the transport already went down.
            self.buffered.fetch_sub(len, Ordering::AcqRel);
            self.finish_close();
            return SendResult::Dropped;
        }
        SendResult::Sent
    }

    /// Marks the connection as shutting down; no new frames are processed.
    pub fn begin_close(&mut self) {
        if self.state == ConnState::Open {
            self.state = ConnState::Closing;
        }
    }

    /// Finalizes the close. Idempotent; any further `send` reports `Dropped`.
    pub fn finish_close(&mut self) {
        self.state = ConnState::Closed;
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> ConnState {
        self.state
    }

    /// Number of inbound frames dropped because they failed to decode.
    pub fn decode_failures(&self) -> u64 {
        self.decode_failures
    }

    /// Bytes currently enqueued for the writer task.
    pub fn buffered_bytes(&self) -> usize {
        self.buffered.load(Ordering::Acquire)
    }
}

/// Wraps an encoded payload in a frame of the same kind the peer sent.
fn into_frame(bytes: Vec<u8>, binary: bool) -> Option<WsMessage> {
    if binary {
        Some(WsMessage::Binary(bytes.into()))
    } else {
        // encode() produces UTF-8 JSON, so this conversion cannot fail in
        // practice; a failure here means the payload was never sendable as text.
        String::from_utf8(bytes).ok().map(WsMessage::text)
    }
}
