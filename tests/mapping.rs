//! End-to-end mapping tests through the public API.

use std::collections::HashMap;

use bytes::Bytes;
use http::Method;
use outbound_http::{
    header_names, HeaderValue, MapperConfig, MapperError, Message, Payload, RequestMapper,
};
use url::Url;

fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}

fn mapper_with_default(default: &str) -> RequestMapper {
    RequestMapper::new(MapperConfig::with_default_url(url(default)))
}

#[test]
fn test_url_header_wins_over_default() {
    let mapper = mapper_with_default("http://fallback.example/");
    let message = Message::new(Payload::Text("x".to_string())).with_header(
        header_names::REQUEST_URL,
        HeaderValue::Url(url("http://primary.example/inbox")),
    );

    let request = mapper.map_to_request(&message).unwrap();
    assert_eq!(request.target_url(), &url("http://primary.example/inbox"));
}

#[test]
fn test_default_url_used_when_header_absent() {
    let mapper = mapper_with_default("http://fallback.example/inbox");
    let message = Message::new(Payload::Text("x".to_string()));

    let request = mapper.map_to_request(&message).unwrap();
    assert_eq!(request.target_url(), &url("http://fallback.example/inbox"));
}

#[test]
fn test_unresolved_target_without_header_or_default() {
    let mapper = RequestMapper::new(MapperConfig::default());
    let message = Message::new(Payload::Text("x".to_string()));

    let err = mapper.map_to_request(&message).unwrap_err();
    assert!(matches!(err, MapperError::UnresolvedTarget));
}

#[test]
fn test_string_url_header_parsed() {
    let mapper = RequestMapper::new(MapperConfig::default());
    let message = Message::new(Payload::Text("x".to_string())).with_header(
        header_names::REQUEST_URL,
        HeaderValue::Text("http://example.org/from-string".to_string()),
    );

    let request = mapper.map_to_request(&message).unwrap();
    assert_eq!(request.target_url().as_str(), "http://example.org/from-string");
}

#[test]
fn test_malformed_string_url_header() {
    let mapper = RequestMapper::new(MapperConfig::default());
    let message = Message::new(Payload::Text("x".to_string())).with_header(
        header_names::REQUEST_URL,
        HeaderValue::Text("not an url".to_string()),
    );

    let err = mapper.map_to_request(&message).unwrap_err();
    assert!(matches!(err, MapperError::MalformedTarget { .. }));
}

#[test]
fn test_byte_payload_post() {
    let mapper = mapper_with_default("http://example.org/");
    let bytes = Bytes::from_static(&[0x01, 0x02, 0xfe, 0xff]);
    let message = Message::new(Payload::Bytes(bytes.clone()));

    let request = mapper.map_to_request(&message).unwrap();
    assert_eq!(request.method(), Method::POST);
    assert_eq!(request.content_type(), Some("application/octet-stream"));
    assert_eq!(request.body(), &bytes);
    assert_eq!(request.content_length(), Some(4));
}

#[test]
fn test_string_payload_put() {
    let mapper = mapper_with_default("http://example.org/");
    let message = Message::new(Payload::Text("hello".to_string())).with_header(
        header_names::REQUEST_METHOD,
        HeaderValue::Text("PUT".to_string()),
    );

    let request = mapper.map_to_request(&message).unwrap();
    assert_eq!(request.method(), Method::PUT);
    assert_eq!(request.content_type(), Some("text/plain; charset=UTF-8"));
    assert_eq!(request.body().as_ref(), "hello".as_bytes());
}

#[test]
fn test_map_payload_get_builds_query() {
    let mapper = mapper_with_default("http://x/y");
    let payload = Payload::Structured(serde_json::json!({"a": "1", "b": ["2", "3"]}));
    let message = Message::new(payload).with_header(
        header_names::REQUEST_METHOD,
        HeaderValue::Text("GET".to_string()),
    );

    let request = mapper.map_to_request(&message).unwrap();
    assert_eq!(request.method(), Method::GET);
    assert_eq!(request.target_url().as_str(), "http://x/y?a=1&b=2&b=3");
    assert!(request.body().is_empty());
    assert_eq!(request.content_type(), None);
    assert_eq!(request.content_length(), None);
}

#[test]
fn test_query_round_trip() {
    let mapper = mapper_with_default("http://example.org/search");
    let payload = Payload::Structured(serde_json::json!({
        "plain": "value",
        "spaced key": "a b",
        "multi": ["first", "second", "third"],
    }));
    let message = Message::new(payload).with_header(
        header_names::REQUEST_METHOD,
        HeaderValue::Text("GET".to_string()),
    );

    let request = mapper.map_to_request(&message).unwrap();

    // Parsing the produced query string back must yield the original
    // key-to-values mapping, with value order preserved per key.
    let mut decoded: HashMap<String, Vec<String>> = HashMap::new();
    for (key, value) in request.target_url().query_pairs() {
        decoded
            .entry(key.into_owned())
            .or_default()
            .push(value.into_owned());
    }
    assert_eq!(decoded["plain"], vec!["value"]);
    assert_eq!(decoded["spaced key"], vec!["a b"]);
    assert_eq!(decoded["multi"], vec!["first", "second", "third"]);
    assert_eq!(decoded.len(), 3);
}

#[test]
fn test_fragment_preserved_through_query_path() {
    let mapper = RequestMapper::new(MapperConfig::default());
    let payload = Payload::Structured(serde_json::json!({"a": "1"}));
    let message = Message::new(payload)
        .with_header(
            header_names::REQUEST_URL,
            HeaderValue::Text("http://example.org/page#frag".to_string()),
        )
        .with_header(
            header_names::REQUEST_METHOD,
            HeaderValue::Text("GET".to_string()),
        );

    let request = mapper.map_to_request(&message).unwrap();
    assert_eq!(request.target_url().fragment(), Some("frag"));
    assert_eq!(request.target_url().as_str(), "http://example.org/page?a=1#frag");
}

#[test]
fn test_query_appended_to_existing_query() {
    let mapper = RequestMapper::new(MapperConfig::default());
    let payload = Payload::Structured(serde_json::json!({"b": "2"}));
    let message = Message::new(payload)
        .with_header(
            header_names::REQUEST_URL,
            HeaderValue::Text("http://example.org/page?a=1".to_string()),
        )
        .with_header(
            header_names::REQUEST_METHOD,
            HeaderValue::Text("DELETE".to_string()),
        );

    let request = mapper.map_to_request(&message).unwrap();
    assert_eq!(request.target_url().as_str(), "http://example.org/page?a=1&b=2");
}

#[test]
fn test_structured_payload_post_serialized_as_json() {
    #[derive(serde::Serialize)]
    struct Order {
        id: u32,
        item: String,
    }

    let mapper = mapper_with_default("http://example.org/orders");
    let payload = Payload::structured(Order {
        id: 7,
        item: "widget".to_string(),
    })
    .unwrap();
    let request = mapper.map_to_request(&Message::new(payload)).unwrap();

    assert_eq!(
        request.content_type(),
        Some("application/x-json-serialized-object")
    );
    let decoded: serde_json::Value = serde_json::from_slice(request.body()).unwrap();
    assert_eq!(decoded, serde_json::json!({"id": 7, "item": "widget"}));
}

#[test]
fn test_envelope_mapping_when_extraction_disabled() {
    let mut config = MapperConfig::with_default_url(url("http://example.org/"));
    config.extract_payload = false;
    let mapper = RequestMapper::new(config);

    let message = Message::new(Payload::Text("hi".to_string()))
        .with_header("trace-id", HeaderValue::Text("abc".to_string()));
    let request = mapper.map_to_request(&message).unwrap();

    assert_eq!(request.method(), Method::POST);
    assert_eq!(
        request.content_type(),
        Some("application/x-json-serialized-object")
    );
    let envelope: serde_json::Value = serde_json::from_slice(request.body()).unwrap();
    assert_eq!(envelope["payload"], "hi");
    assert_eq!(envelope["headers"]["trace-id"], "abc");
}

#[test]
fn test_extraction_disabled_rejects_query_methods() {
    let mut config = MapperConfig::with_default_url(url("http://example.org/"));
    config.extract_payload = false;
    let mapper = RequestMapper::new(config);

    let message = Message::new(Payload::Text("hi".to_string())).with_header(
        header_names::REQUEST_METHOD,
        HeaderValue::Text("GET".to_string()),
    );
    let err = mapper.map_to_request(&message).unwrap_err();
    assert!(matches!(err, MapperError::MethodNotSupported { .. }));
}

#[test]
fn test_charset_swap_applies_to_next_call() {
    let mapper = mapper_with_default("http://example.org/");
    let message = Message::new(Payload::Text("caf\u{e9}".to_string()));

    let before = mapper.map_to_request(&message).unwrap();
    assert_eq!(before.body().as_ref(), "caf\u{e9}".as_bytes());
    assert_eq!(before.content_type(), Some("text/plain; charset=UTF-8"));

    mapper.config().set_charset("windows-1252").unwrap();

    let after = mapper.map_to_request(&message).unwrap();
    assert_eq!(after.body().as_ref(), &[b'c', b'a', b'f', 0xe9]);
    assert_eq!(after.content_type(), Some("text/plain; charset=windows-1252"));
}

#[test]
fn test_unknown_charset_rejected_at_set_time() {
    let mapper = mapper_with_default("http://example.org/");
    let err = mapper.config().set_charset("KLINGON-1").unwrap_err();
    assert!(matches!(err, MapperError::UnsupportedCharset { .. }));

    // Mapping still works with the previous charset.
    let message = Message::new(Payload::Text("ok".to_string()));
    let request = mapper.map_to_request(&message).unwrap();
    assert_eq!(request.content_type(), Some("text/plain; charset=UTF-8"));
}

#[test]
fn test_descriptor_hands_off_to_http_request() {
    let mapper = mapper_with_default("http://example.org/inbox");
    let message = Message::new(Payload::Text("hello".to_string()));

    let request = mapper.map_to_request(&message).unwrap();
    let http_request: http::Request<Bytes> = request.try_into().unwrap();

    assert_eq!(http_request.method(), Method::POST);
    assert_eq!(http_request.uri(), "http://example.org/inbox");
    assert_eq!(
        http_request.headers().get(http::header::CONTENT_LENGTH).unwrap(),
        "5"
    );
}
