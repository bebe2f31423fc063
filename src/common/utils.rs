//! 共通ユーティリティ関数群（URLデコード、クエリ解析、Cookieヘッダー解析、環境設定）

use std::env;
use super::map::StringMap;

/// ボディサイズ上限を指定する環境変数
pub const MAX_BODY_SIZE_ENV: &str = "HTTPENV_MAX_BODY_SIZE";

/// URLエンコーディングのデコード関数
pub fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(h), Some(l)) = (from_hex(bytes[i + 1]), from_hex(bytes[i + 2])) {
                result.push(h * 16 + l);
                i += 3;
                continue;
            }
        } else if bytes[i] == b'+' {
            result.push(b' ');
            i += 1;
            continue;
        }
        result.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&result).into_owned()
}

/// 16進数文字をバイト値に変換するヘルパー関数
fn from_hex(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// クエリ文字列をパースしてURLデコードを行う（出現順を保持）
pub fn parse_query_string(query_string: &str) -> StringMap {
    let mut params = StringMap::new();

    for pair in query_string.split('&') {
        if pair.is_empty() {
            continue;
        }
        let mut parts = pair.splitn(2, '=');
        if let Some(key) = parts.next() {
            let value = parts.next().unwrap_or("");
            params.set(percent_decode(key), percent_decode(value));
        }
    }

    params
}

/// `Cookie` ヘッダー値（`a=1; b=2`）を名前と値の組に分解する
///
/// `=` を含まない要素は無視する。
pub fn parse_cookie_header(header: &str) -> StringMap {
    let mut cookies = StringMap::new();

    for cookie_pair in header.split(';') {
        let mut parts = cookie_pair.trim().splitn(2, '=');
        if let (Some(name), Some(value)) = (parts.next(), parts.next()) {
            if name.is_empty() {
                continue;
            }
            cookies.set(name, percent_decode(value));
        }
    }

    cookies
}

/// リクエストボディの最大サイズ（バイト）を取得する
/// 優先順位: 環境変数 `HTTPENV_MAX_BODY_SIZE` -> デフォルト 5MB
pub fn get_max_body_size() -> usize {
    const DEFAULT_MAX_SIZE: usize = 5 * 1024 * 1024; // 5MB
    env::var(MAX_BODY_SIZE_ENV)
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_MAX_SIZE)
}
