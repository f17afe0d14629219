//! The `error` module defines the custom error types used within the `wsamp`
//! application.
//!
//! Errors are scoped deliberately: a [`DecodeError`] is recovered per frame
//! and never crosses a connection boundary, while a [`ServerError`] is fatal
//! to startup and surfaced to the caller to decide on retry or exit.

use thiserror::Error;

/// A frame that could not be decoded into an inbound message.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("frame is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("frame is not a valid inbound message: {0}")]
    Json(#[from] serde_json::Error),
}

/// A failure that prevents the server from starting.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind listener on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}
