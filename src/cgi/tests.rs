//! CGIモジュールのテスト

use std::io::Cursor;

use temp_env::with_vars;

use crate::common::HttpCookie;
use crate::request::Snapshot;
use super::request::{from_snapshot, snapshot_from_env};
use super::summary::RequestSummary;

fn snapshot(pairs: &[(&str, &str)]) -> Snapshot {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_snapshot_from_env() {
    with_vars([
        ("HTTP_X_AUTH_TOKEN", Some("secret-token")),
        ("REQUEST_METHOD", Some("PUT")),
    ], || {
        let server = snapshot_from_env();
        assert_eq!(server.get("HTTP_X_AUTH_TOKEN").map(String::as_str), Some("secret-token"));
        assert_eq!(server.get("REQUEST_METHOD").map(String::as_str), Some("PUT"));
    });
}

#[test]
fn test_from_snapshot_parses_query_and_cookies() {
    let server = snapshot(&[
        ("REQUEST_METHOD", "POST"),
        ("REQUEST_URI", "/search?q=rust%20lang&page=2"),
        ("SCRIPT_NAME", "/index.php"),
        ("QUERY_STRING", "q=rust%20lang&page=2"),
        ("HTTP_COOKIE", "session=abc123; theme=dark"),
        ("CONTENT_LENGTH", "5"),
    ]);

    let request = from_snapshot(server, Cursor::new(b"hello world".to_vec())).unwrap();

    assert_eq!(request.path(), "/search");
    assert_eq!(request.arguments().get("q"), Some("rust lang"));
    assert_eq!(request.arguments().get("page"), Some("2"));
    let cookies: Vec<(&str, &str)> = request.cookies().iter().map(|c| (c.name(), c.value())).collect();
    assert_eq!(cookies, vec![("session", "abc123"), ("theme", "dark")]);
    assert_eq!(request.headers().get("Cookie"), Some("session=abc123; theme=dark"));

    // CONTENT_LENGTHを超えた分は読まない
    assert_eq!(request.content().unwrap(), "hello");
}

#[test]
fn test_from_snapshot_without_content_length() {
    let request = from_snapshot(snapshot(&[]), Cursor::new(b"ignored".to_vec())).unwrap();
    assert_eq!(request.content_bytes().unwrap(), b"");

    let invalid = snapshot(&[("CONTENT_LENGTH", "abc")]);
    let request = from_snapshot(invalid, Cursor::new(b"ignored".to_vec())).unwrap();
    assert_eq!(request.content_bytes().unwrap(), b"");
}

#[test]
fn test_from_snapshot_payload_too_large() {
    with_vars([("HTTPENV_MAX_BODY_SIZE", Some("10"))], || {
        let server = snapshot(&[("CONTENT_LENGTH", "11")]);
        let err = from_snapshot(server, Cursor::new(Vec::new())).unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("exceeds maximum allowed size 10 bytes"));

        let server = snapshot(&[("CONTENT_LENGTH", "10")]);
        assert!(from_snapshot(server, Cursor::new(Vec::new())).is_ok());
    });
}

#[test]
fn test_request_summary() {
    let server = snapshot(&[
        ("REQUEST_METHOD", "GET"),
        ("REQUEST_URI", "/posts/1"),
        ("SERVER_NAME", "example.com"),
        ("REMOTE_PORT", "54321"),
        ("REMOTE_ADDR", "192.0.2.1"),
        ("HTTPS", "on"),
        ("HTTP_X_REQUESTED_WITH", "XMLHttpRequest"),
        ("QUERY_STRING", "a=1"),
    ]);
    let request = from_snapshot(server, Cursor::new(Vec::new())).unwrap();
    let summary = RequestSummary::from(&request);

    assert_eq!(summary.method, "GET");
    assert_eq!(summary.path, "/posts/1");
    assert_eq!(summary.host_name, "example.com");
    assert_eq!(summary.port, 54321);
    assert_eq!(summary.remote_ip_address, "192.0.2.1");
    assert!(summary.secure);
    assert!(summary.xml_http_request);

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["headers"]["X-Requested-With"], "XMLHttpRequest");
    assert_eq!(json["arguments"]["a"], "1");
    assert_eq!(json["cookies"], serde_json::json!({}));
}
