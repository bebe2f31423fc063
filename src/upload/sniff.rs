//! ファイル内容からのMIMEタイプ判定
//!
//! クライアントが申告したContent-Typeは信用せず、先頭バイトだけを見て判定する。

/// 判定に使う先頭バイト数
pub const SNIFF_LEN: usize = 512;

pub const EMPTY: &str = "application/x-empty";
pub const OCTET_STREAM: &str = "application/octet-stream";
pub const TEXT_PLAIN: &str = "text/plain";
pub const TEXT_HTML: &str = "text/html";
pub const TEXT_XML: &str = "text/xml";

/// マジックナンバーと対応するMIMEタイプ
const SIGNATURES: &[(&[u8], &str)] = &[
    (b"%PDF-", "application/pdf"),
    (b"\x89PNG\r\n\x1a\n", "image/png"),
    (b"\xff\xd8\xff", "image/jpeg"),
    (b"GIF87a", "image/gif"),
    (b"GIF89a", "image/gif"),
    (b"PK\x03\x04", "application/zip"),
    (b"\x1f\x8b", "application/gzip"),
    (b"7z\xbc\xaf\x27\x1c", "application/x-7z-compressed"),
    (b"ID3", "audio/mpeg"),
    (b"OggS", "audio/ogg"),
];

/// HTML文書の先頭に現れるタグ（小文字で比較）
const HTML_MARKERS: &[&[u8]] = &[
    b"<!doctype html",
    b"<html",
    b"<head",
    b"<body",
    b"<title",
    b"<script",
    b"<style",
    b"<iframe",
    b"<table",
    b"<div",
    b"<h1",
    b"<a ",
    b"<p>",
    b"<br",
    b"<!--",
];

/// 内容からMIMEタイプを判定する
pub fn detect_mime_type(content: &[u8]) -> &'static str {
    if content.is_empty() {
        return EMPTY;
    }

    let head = &content[..content.len().min(SNIFF_LEN)];

    if head.len() >= 12 && &head[..4] == b"RIFF" && &head[8..12] == b"WEBP" {
        return "image/webp";
    }

    if let Some((_, mime)) = SIGNATURES.iter().find(|(magic, _)| head.starts_with(magic)) {
        return mime;
    }

    if !looks_like_text(head) {
        return OCTET_STREAM;
    }

    let trimmed = trim_leading_whitespace(head);
    if trimmed.starts_with(b"<?xml") {
        return TEXT_XML;
    }
    if HTML_MARKERS.iter().any(|marker| starts_with_ignore_case(trimmed, marker)) {
        return TEXT_HTML;
    }

    TEXT_PLAIN
}

/// 制御文字（タブ・改行・改ページ・ESCを除く）を含まなければテキストとみなす
fn looks_like_text(bytes: &[u8]) -> bool {
    let text_like = bytes
        .iter()
        .all(|&b| (b >= 0x20 && b != 0x7f) || matches!(b, b'\t' | b'\n' | b'\r' | 0x0c | 0x1b));
    if !text_like {
        return false;
    }
    // 先頭512バイトで切ったことによるマルチバイト途中切れは許容し、
    // UTF-8でなければC1制御文字を含まない限りISO-8859系のテキストとみなす
    match std::str::from_utf8(bytes) {
        Ok(_) => true,
        Err(e) if e.error_len().is_none() => true,
        Err(_) => !bytes.iter().any(|&b| (0x80..0xa0).contains(&b)),
    }
}

fn trim_leading_whitespace(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    &bytes[start..]
}

fn starts_with_ignore_case(haystack: &[u8], prefix: &[u8]) -> bool {
    haystack.len() >= prefix.len() && haystack[..prefix.len()].eq_ignore_ascii_case(prefix)
}
