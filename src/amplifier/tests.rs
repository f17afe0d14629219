use super::amplify;
use crate::codec::InboundMessage;

fn inbound(created_at: i64) -> InboundMessage {
    InboundMessage {
        client_id: "c1".to_string(),
        msg: "hello".to_string(),
        created_at,
    }
}

#[test]
fn test_amplify_produces_factor_messages() {
    for factor in [1, 2, 5] {
        let out = amplify(&inbound(1000), factor, 1050);
        assert_eq!(out.len(), factor);
    }
}

#[test]
fn test_amplified_copies_are_identical() {
    let out = amplify(&inbound(1000), 4, 1050);
    for msg in &out {
        assert_eq!(msg, &out[0]);
    }
}

#[test]
fn test_amplify_field_mapping() {
    let out = amplify(&inbound(1000), 2, 1050);
    for msg in &out {
        assert_eq!(msg.client_id, "c1");
        assert_eq!(msg.msg_id, "c1");
        assert_eq!(msg.msg, "hello");
        assert_eq!(msg.created_at, 1050);
        assert_eq!(msg.client_ts, 1000);
        assert_eq!(msg.server_latency, 50);
    }
}

#[test]
fn test_negative_latency_is_preserved() {
    // Client clock ahead of the server: latency is negative, not an error.
    let out = amplify(&inbound(2000), 1, 1950);
    assert_eq!(out[0].server_latency, -50);
    assert_eq!(out[0].created_at, 1950);
    assert_eq!(out[0].client_ts, 2000);
}

#[test]
fn test_zero_latency() {
    let out = amplify(&inbound(1234), 1, 1234);
    assert_eq!(out[0].server_latency, 0);
}
