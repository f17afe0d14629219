//! The `connection` module owns the per-connection state machine.
//!
//! Each accepted WebSocket connection gets exactly one
//! [`ConnectionHandler`], which decodes inbound frames, runs them through
//! the amplifier, and enqueues replies for the connection's writer task
//! under a bounded outbound buffer. Handlers share nothing mutable with
//! each other; only the immutable configuration is common.

pub mod handler;

pub use handler::{ConnState, ConnectionHandler, SendResult};

#[cfg(test)]
mod tests;
