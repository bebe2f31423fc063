//! サーバー環境スナップショットからの値の導出

use std::net::IpAddr;
use indexmap::IndexMap;

use crate::common::{Method, StringMap};

/// HTTPヘッダーを表すキーの接頭辞
pub const HEADER_PREFIX: &str = "HTTP_";

/// フロントコントローラーのスクリプト名
pub const FRONT_CONTROLLER: &str = "index.php";

/// プロキシ経由のクライアントIPを探すキー（優先順）
pub const FORWARDED_IP_KEYS: [&str; 3] = [
    "HTTP_X_FORWARDED_FOR",
    "HTTP_CLIENT_IP",
    "HTTP_TRUE_CLIENT_IP",
];

pub type Snapshot = IndexMap<String, String>;

fn var<'a>(server: &'a Snapshot, key: &str) -> &'a str {
    server.get(key).map(String::as_str).unwrap_or("")
}

pub fn method(server: &Snapshot) -> Method {
    Method::from_server_value(var(server, "REQUEST_METHOD"))
}

/// `HTTP_ACCEPT_LANGUAGE` -> `Accept-Language` のように変換したヘッダー
pub fn headers(server: &Snapshot) -> StringMap {
    server
        .iter()
        .filter_map(|(key, value)| {
            key.strip_prefix(HEADER_PREFIX)
                .map(|name| (canonical_header_name(name), value.clone()))
        })
        .collect()
}

/// `_` 区切りの各要素を小文字化して先頭だけ大文字にし、`-` で連結する
pub fn canonical_header_name(raw: &str) -> String {
    raw.split('_')
        .map(|part| {
            let lower = part.to_ascii_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => c.to_ascii_uppercase().to_string() + chars.as_str(),
            }
        })
        .collect::<Vec<String>>()
        .join("-")
}

/// リクエストパスを導出する
///
/// `SCRIPT_NAME` に `index.php` が含まれる場合だけ、URIのパス部分から
/// スクリプト名（またはそのディレクトリ部分）を接頭辞として取り除く。
pub fn path(server: &Snapshot) -> String {
    let script_name = var(server, "SCRIPT_NAME");
    let uri = var(server, "REQUEST_URI");
    let uri_path = uri.split('?').next().unwrap_or("");

    let mut remainder = uri_path;
    if script_name.contains(FRONT_CONTROLLER) {
        let base = script_name.replace(FRONT_CONTROLLER, "");
        if let Some(rest) = uri_path.strip_prefix(script_name) {
            remainder = rest;
        } else if let Some(rest) = uri_path.strip_prefix(base.as_str()) {
            remainder = rest;
        }
    }

    format!("/{}", remainder.trim_start_matches('/'))
}

pub fn host_name(server: &Snapshot) -> String {
    var(server, "SERVER_NAME").to_string()
}

/// `REMOTE_PORT` を整数として読む（読めなければ0）
pub fn port(server: &Snapshot) -> u32 {
    var(server, "REMOTE_PORT").trim().parse().unwrap_or(0)
}

/// `HTTPS` が存在し、空・"0"・"off" 以外ならTLS接続とみなす
pub fn is_secure(server: &Snapshot) -> bool {
    match server.get("HTTPS") {
        Some(value) => {
            let value = value.trim();
            !(value.is_empty() || value == "0" || value.eq_ignore_ascii_case("off"))
        }
        None => false,
    }
}

/// クライアントIPを決定する
///
/// 転送ヘッダーを優先順に調べ、IPアドレスとして解釈できる最初の値を採用する。
/// どれも使えなければ `REMOTE_ADDR` をそのまま返す（空の場合もある）。
pub fn remote_ip_address(server: &Snapshot) -> String {
    FORWARDED_IP_KEYS
        .iter()
        .filter_map(|key| server.get(*key))
        .map(|value| value.trim())
        .find(|value| value.parse::<IpAddr>().is_ok())
        .unwrap_or_else(|| var(server, "REMOTE_ADDR"))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(pairs: &[(&str, &str)]) -> Snapshot {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_canonical_header_name() {
        assert_eq!(canonical_header_name("ACCEPT_LANGUAGE"), "Accept-Language");
        assert_eq!(canonical_header_name("X_REQUESTED_WITH"), "X-Requested-With");
        assert_eq!(canonical_header_name("HOST"), "Host");
        assert_eq!(canonical_header_name("dnt"), "Dnt");
    }

    #[test]
    fn test_headers_keep_order() {
        let server = snapshot(&[
            ("HTTP_ACCEPT_LANGUAGE", "en"),
            ("SERVER_NAME", "localhost"),
            ("HTTP_ACCEPT_ENCODING", "gzip"),
        ]);
        let headers = headers(&server);
        let pairs: Vec<(&str, &str)> = headers.iter().collect();
        assert_eq!(pairs, vec![("Accept-Language", "en"), ("Accept-Encoding", "gzip")]);
    }

    #[test]
    fn test_path_variants() {
        let cases = [
            ("/my/local/path/index.php", "/my/local/path/webserver/folder/file?xxx=yyy", "/webserver/folder/file"),
            ("unknown-fil", "/webserver/folder/file.png?xxx=yyy", "/webserver/folder/file.png"),
            ("/2017-02-28--1/public/index.php", "/posts/123/?xxx=yyy", "/posts/123/"),
            ("/index.php", "/index.php/foo", "/foo"),
            ("/index.php", "/foo", "/foo"),
            ("/app/index.php", "/app/index.php", "/"),
            ("", "", "/"),
            ("", "//double//slash", "/double//slash"),
        ];
        for (script, uri, expected) in cases {
            let server = snapshot(&[("SCRIPT_NAME", script), ("REQUEST_URI", uri)]);
            assert_eq!(path(&server), expected, "SCRIPT_NAME={} REQUEST_URI={}", script, uri);
        }
    }

    #[test]
    fn test_port_and_secure() {
        assert_eq!(port(&snapshot(&[("REMOTE_PORT", "123456")])), 123456);
        assert_eq!(port(&snapshot(&[("REMOTE_PORT", "abc")])), 0);
        assert_eq!(port(&snapshot(&[])), 0);

        assert!(is_secure(&snapshot(&[("HTTPS", "on")])));
        assert!(is_secure(&snapshot(&[("HTTPS", "1")])));
        assert!(!is_secure(&snapshot(&[("HTTPS", "off")])));
        assert!(!is_secure(&snapshot(&[("HTTPS", "")])));
        assert!(!is_secure(&snapshot(&[])));
    }

    #[test]
    fn test_remote_ip_priority() {
        let direct = snapshot(&[("REMOTE_ADDR", "127.127.127.127")]);
        assert_eq!(remote_ip_address(&direct), "127.127.127.127");

        let all = snapshot(&[
            ("REMOTE_ADDR", "10.0.0.1"),
            ("HTTP_TRUE_CLIENT_IP", "3.3.3.3"),
            ("HTTP_CLIENT_IP", "2.2.2.2"),
            ("HTTP_X_FORWARDED_FOR", "1.1.1.1"),
        ]);
        assert_eq!(remote_ip_address(&all), "1.1.1.1");

        let invalid_forwarded = snapshot(&[
            ("REMOTE_ADDR", "10.0.0.1"),
            ("HTTP_X_FORWARDED_FOR", "not-an-ip"),
            ("HTTP_CLIENT_IP", "2001:db8::1"),
        ]);
        assert_eq!(remote_ip_address(&invalid_forwarded), "2001:db8::1");

        let only_true_client = snapshot(&[
            ("REMOTE_ADDR", "10.0.0.1"),
            ("HTTP_X_FORWARDED_FOR", "1.1.1.1, 2.2.2.2"),
            ("HTTP_TRUE_CLIENT_IP", "3.3.3.3"),
        ]);
        assert_eq!(remote_ip_address(&only_true_client), "3.3.3.3");

        assert_eq!(remote_ip_address(&snapshot(&[])), "");
    }
}
