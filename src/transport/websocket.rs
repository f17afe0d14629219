use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::accept_async;
use tracing::{debug, error, info, warn};
use tungstenite::protocol::Message as WsMessage;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::config::Settings;
use crate::connection::ConnectionHandler;
use crate::utils::error::ServerError;

/// Binds the TCP listener for the server.
///
/// A bind failure is returned, not panicked on; whether to retry or exit is
/// the caller's decision.
pub async fn bind(addr: &str) -> Result<TcpListener, ServerError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.to_string(),
            source,
        })
}

/// Binds `addr` and serves WebSocket connections on it until the process ends.
pub async fn start_websocket_server(addr: &str, settings: Settings) -> Result<(), ServerError> {
    let listener = bind(addr).await?;
    info!("WebSocket server listening on ws://{}", addr);
    serve(listener, settings).await;
    Ok(())
}

/// Accept loop: every connection gets its own task and its own
/// [`ConnectionHandler`]. Handlers share only the immutable settings.
pub async fn serve(listener: TcpListener, settings: Settings) {
    while let Ok((stream, _)) = listener.accept().await {
        let settings = settings.clone();
        let conn_id = format!("conn-{}", uuid::Uuid::new_v4());

        tokio::spawn(async move {
            handle_connection(stream, conn_id, settings).await;
        });
    }
}

async fn handle_connection(stream: TcpStream, conn_id: String, settings: Settings) {
    // Accepts the upgrade on whatever path the client requested; there is a
    // single wildcard endpoint. No compression is negotiated and no
    // keep-alive pings are sent, so idle connections stay up indefinitely.
    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            error!("WebSocket handshake error: {}", e);
            return;
        }
    };

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    // Outbound channel for this connection, drained by the writer task. The
    // byte counter is the handler's view of how much is still queued.
    let (tx, mut rx) = mpsc::unbounded_channel::<WsMessage>();
    let buffered = Arc::new(AtomicUsize::new(0));
    let mut handler =
        ConnectionHandler::new(conn_id.clone(), &settings.amplifier, tx, buffered.clone());

    // Writer task: socket writes happen here so the read loop never waits
    // on a slow peer. Buffer space is released as frames drain.
    let writer_id = conn_id.clone();
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            let len = frame.len();
            let result = ws_sender.send(frame).await;
            buffered.fetch_sub(len, Ordering::AcqRel);
            if let Err(e) = result {
                error!("Failed to send frame to {}: {}", writer_id, e);
                break;
            }
        }
        debug!("Send loop closed for {}", writer_id);
    });

    debug!("{} connected", conn_id);

    while let Some(result) = ws_receiver.next().await {
        let frame = match result {
            Ok(frame) => frame,
            Err(e) => {
                // Socket reset or protocol violation: fatal to this
                // connection only.
                warn!("Transport error on {}: {}", conn_id, e);
                break;
            }
        };

        match frame {
            WsMessage::Text(text) => {
                let now = chrono::Utc::now().timestamp_millis();
                handler.handle_frame(text.as_bytes(), false, now);
            }
            WsMessage::Binary(data) => {
                let now = chrono::Utc::now().timestamp_millis();
                handler.handle_frame(&data, true, now);
            }
            WsMessage::Close(close) => {
                match close {
                    Some(cf) => debug!(
                        "{} sent close with code {} and reason `{}`",
                        conn_id, cf.code, cf.reason
                    ),
                    None => debug!("{} sent close without a close frame", conn_id),
                }
                handler.begin_close();
                break;
            }
            // Ping/pong are answered by tungstenite itself.
            _ => {}
        }
    }

    handler.finish_close();
    info!("{} disconnected", conn_id);
}
