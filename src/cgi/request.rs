//! CGIリクエストの構築

use std::env;
use std::io::{self, Read};

use log::debug;

use crate::common::{get_max_body_size, parse_cookie_header, parse_query_string};
use crate::error::Error;
use crate::request::{Request, Snapshot};

/// 現在のプロセス環境変数をスナップショットとして取得する
pub fn snapshot_from_env() -> Snapshot {
    env::vars().collect()
}

/// 環境変数と標準入力からリクエストを構築する
pub fn request_from_env() -> Result<Request, Error> {
    from_snapshot(snapshot_from_env(), io::stdin())
}

/// スナップショットと入力ストリームからリクエストを構築する
///
/// ボディは `CONTENT_LENGTH` バイトまでに制限される。
pub(crate) fn from_snapshot<R>(server: Snapshot, input: R) -> Result<Request, Error>
where
    R: Read + Send + 'static,
{
    let content_length = content_length(&server)?;

    let query = parse_query_string(server.get("QUERY_STRING").map(String::as_str).unwrap_or(""));
    let cookies = parse_cookie_header(server.get("HTTP_COOKIE").map(String::as_str).unwrap_or(""));
    debug!(
        "Building CGI request: {} query args, {} cookies, {} body bytes",
        query.len(),
        cookies.len(),
        content_length
    );

    let builder = cookies
        .iter()
        .fold(Request::builder(), |builder, (name, value)| builder.cookie(name, value));

    builder
        .server_vars(server)
        .query_args(query)
        .body_stream(input.take(content_length))
        .build()
}

/// `CONTENT_LENGTH` を読み、上限を超えていればエラー（読めなければ0）
fn content_length(server: &Snapshot) -> Result<u64, Error> {
    let content_length = server
        .get("CONTENT_LENGTH")
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(0);

    let max_body_size = get_max_body_size() as u64;
    if content_length > max_body_size {
        return Err(Error::PayloadTooLarge(format!(
            "Request body size {} bytes exceeds maximum allowed size {} bytes",
            content_length, max_body_size
        )));
    }
    Ok(content_length)
}
