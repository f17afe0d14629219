//! The `transport` module is responsible for handling network communication
//! with clients via WebSockets.
//!
//! It binds the TCP listener, performs the WebSocket upgrade on a single
//! wildcard path, and gives every accepted connection its own task wired to
//! a [`crate::connection::ConnectionHandler`].

pub mod websocket;

pub use websocket::{bind, serve, start_websocket_server};
