use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::json;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tungstenite::protocol::Message as WsMessage;

use super::{ConnState, ConnectionHandler, SendResult};
use crate::config::AmplifierSettings;

fn handler_with(
    factor: usize,
    max_backpressure_bytes: usize,
) -> (
    ConnectionHandler,
    UnboundedReceiver<WsMessage>,
    Arc<AtomicUsize>,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let buffered = Arc::new(AtomicUsize::new(0));
    let settings = AmplifierSettings {
        factor,
        max_backpressure_bytes,
    };
    let handler = ConnectionHandler::new("conn-test".to_string(), &settings, tx, buffered.clone());
    (handler, rx, buffered)
}

fn valid_frame() -> Vec<u8> {
    json!({ "client_id": "c1", "msg": "hello", "created_at": 1000 })
        .to_string()
        .into_bytes()
}

#[test]
fn test_valid_frame_is_amplified() {
    let (mut handler, mut rx, _) = handler_with(2, 256 * 1024);

    handler.handle_frame(&valid_frame(), false, 1050);

    for _ in 0..2 {
        let frame = rx.try_recv().expect("expected a reply frame");
        let WsMessage::Text(text) = frame else {
            panic!("expected a text frame");
        };
        let value: serde_json::Value = serde_json::from_str(text.as_str()).unwrap();
        assert_eq!(value["client_id"], "c1");
        assert_eq!(value["msg_id"], "c1");
        assert_eq!(value["msg"], "hello");
        assert_eq!(value["created_at"], 1050);
        assert_eq!(value["client_ts"], 1000);
        assert_eq!(value["server_latency"], 50);
    }
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_binary_frame_gets_binary_replies() {
    let (mut handler, mut rx, _) = handler_with(1, 256 * 1024);

    handler.handle_frame(&valid_frame(), true, 1050);

    let frame = rx.try_recv().expect("expected a reply frame");
    assert!(matches!(frame, WsMessage::Binary(_)));
}

#[test]
fn test_undecodable_frame_is_dropped_without_closing() {
    let (mut handler, mut rx, _) = handler_with(2, 256 * 1024);

    handler.handle_frame(b"not json", false, 1050);

    assert!(rx.try_recv().is_err());
    assert_eq!(handler.state(), ConnState::Open);
    assert_eq!(handler.decode_failures(), 1);

    // The connection keeps working afterwards.
    handler.handle_frame(&valid_frame(), false, 1100);
    assert!(rx.try_recv().is_ok());
}

#[test]
fn test_replies_are_sent_in_generation_order() {
    let (mut handler, mut rx, _) = handler_with(2, 256 * 1024);

    let first = json!({ "client_id": "c1", "msg": "first", "created_at": 1 }).to_string();
    let second = json!({ "client_id": "c1", "msg": "second", "created_at": 2 }).to_string();
    handler.handle_frame(first.as_bytes(), false, 10);
    handler.handle_frame(second.as_bytes(), false, 20);

    let mut bodies = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        let value: serde_json::Value = serde_json::from_str(frame.to_text().unwrap()).unwrap();
        bodies.push(value["msg"].as_str().unwrap().to_string());
    }
    assert_eq!(bodies, ["first", "first", "second", "second"]);
}

#[test]
fn test_backpressure_drops_without_closing() {
    // Ceiling smaller than a single reply: every send is rejected.
    let (mut handler, mut rx, _) = handler_with(1, 8);

    handler.handle_frame(&valid_frame(), false, 1050);

    assert!(rx.try_recv().is_err());
    assert_eq!(handler.state(), ConnState::Open);
    assert_eq!(handler.decode_failures(), 0);
}

#[test]
fn test_send_reports_backpressured_at_ceiling() {
    let (mut handler, _rx, _) = handler_with(1, 16);

    assert_eq!(
        handler.send(WsMessage::text("0123456789")),
        SendResult::Sent
    );
    // 10 bytes buffered; another 10 would cross the 16-byte ceiling.
    assert_eq!(
        handler.send(WsMessage::text("0123456789")),
        SendResult::Backpressured
    );
    assert_eq!(handler.buffered_bytes(), 10);
}

#[test]
fn test_send_recovers_after_writer_drains() {
    let (mut handler, mut rx, buffered) = handler_with(1, 16);

    assert_eq!(
        handler.send(WsMessage::text("0123456789")),
        SendResult::Sent
    );
    assert_eq!(
        handler.send(WsMessage::text("0123456789")),
        SendResult::Backpressured
    );

    // Simulate the writer task flushing the frame onto the socket.
    let frame = rx.try_recv().unwrap();
    buffered.fetch_sub(frame.len(), Ordering::AcqRel);

    assert_eq!(
        handler.send(WsMessage::text("0123456789")),
        SendResult::Sent
    );
}

#[test]
fn test_send_after_close_is_dropped() {
    let (mut handler, mut rx, _) = handler_with(1, 256 * 1024);

    handler.begin_close();
    assert_eq!(handler.state(), ConnState::Closing);
    handler.finish_close();
    assert_eq!(handler.state(), ConnState::Closed);

    assert_eq!(handler.send(WsMessage::text("late")), SendResult::Dropped);
    handler.handle_frame(&valid_frame(), false, 1050);
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_send_detects_writer_gone() {
    let (mut handler, rx, _) = handler_with(1, 256 * 1024);
    drop(rx);

    assert_eq!(handler.send(WsMessage::text("x")), SendResult::Dropped);
    assert_eq!(handler.state(), ConnState::Closed);
    assert_eq!(handler.buffered_bytes(), 0);
}
