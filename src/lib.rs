//! # wsamp
//!
//! `wsamp` is a minimal WebSocket echo/amplification server built with Rust.
//! Every inbound JSON message is decoded, stamped with server time, amplified
//! into a configurable number of outbound messages carrying latency metrics,
//! and sent back to the originating connection. It is designed as a small,
//! reusable real-time fan-out primitive.
//!
//! ## Core Modules
//!
//! The library is structured into several modules, each with a distinct responsibility:
//!
//! - `codec`: Parses and serializes the JSON wire envelope.
//! - `amplifier`: Pure fan-out of one inbound message into N outbound messages.
//! - `connection`: The per-connection state machine with its bounded outbound buffer.
//! - `transport`: The TCP/WebSocket listener and per-connection task wiring.
//! - `config`: Handles loading and managing server configuration.
//! - `utils`: Contains shared utilities, such as error types and logging setup.

pub mod amplifier;
pub mod codec;
pub mod config;
pub mod connection;
pub mod transport;
pub mod utils;
