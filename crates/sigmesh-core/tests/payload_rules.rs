//! Payload decode and normalization rules.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use serde_json::json;

use sigmesh_core::protocol::payload;

#[test]
fn decode_object_body() {
    let msg = payload::decode(br#"{"method":"relay-add","mid":"m1"}"#).unwrap();
    assert_eq!(payload::text(&msg, "method"), Some("relay-add"));
    assert_eq!(payload::text(&msg, "mid"), Some("m1"));
}

#[test]
fn decode_rejects_non_object() {
    let err = payload::decode(b"[1,2,3]").expect_err("array body must fail");
    assert_eq!(err.kind(), "DECODE");

    let err = payload::decode(b"{not json").expect_err("garbage must fail");
    assert_eq!(err.kind(), "DECODE");
}

#[test]
fn text_tolerates_absence() {
    let msg = payload::decode(br#"{"rid":"room1","empty":"","n":7}"#).unwrap();
    assert_eq!(payload::text(&msg, "rid"), Some("room1"));
    assert_eq!(payload::text(&msg, "missing"), None);
    assert_eq!(payload::text(&msg, "empty"), None);
    assert_eq!(payload::text(&msg, "n"), None);
}

#[test]
fn normalize_parses_serialized_field() {
    let mut msg = payload::decode(br#"{"info":"{\"k\":\"v\"}"}"#).unwrap();
    payload::normalize(&mut msg, "info").unwrap();
    assert_eq!(msg["info"], json!({"k": "v"}));
}

#[test]
fn normalize_twice_equals_once() {
    let mut once = payload::decode(br#"{"info":"{\"k\":\"v\"}"}"#).unwrap();
    payload::normalize(&mut once, "info").unwrap();

    let mut twice = once.clone();
    payload::normalize(&mut twice, "info").unwrap();
    assert_eq!(once, twice);
}

#[test]
fn normalize_skips_absent_and_empty() {
    let mut msg = payload::decode(br#"{"info":""}"#).unwrap();
    payload::normalize(&mut msg, "info").unwrap();
    assert_eq!(msg["info"], json!(""));

    let mut msg = payload::decode(br#"{"rid":"room1"}"#).unwrap();
    payload::normalize(&mut msg, "info").unwrap();
    assert!(!msg.contains_key("info"));
}

#[test]
fn normalize_surfaces_malformed_content() {
    let mut msg = payload::decode(br#"{"info":"{broken"}"#).unwrap();
    let err = payload::normalize(&mut msg, "info").expect_err("must fail");
    assert_eq!(err.kind(), "DECODE");

    let mut msg = payload::decode(br#"{"info":"42"}"#).unwrap();
    let err = payload::normalize(&mut msg, "info").expect_err("scalar is not a sub-object");
    assert_eq!(err.kind(), "DECODE");
}

#[test]
fn from_pairs_builds_string_fields() {
    let msg = payload::from_pairs([("rid", "room1"), ("pid", "peerA")]);
    assert_eq!(payload::text(&msg, "rid"), Some("room1"));
    assert_eq!(payload::text(&msg, "pid"), Some("peerA"));
    assert_eq!(msg.len(), 2);
}
