//! CGI環境での実行をサポートするモジュール
//!
//! プロセスの環境変数と標準入力から [`Request`](crate::Request) を構築する。

pub mod request;
pub mod summary;

pub use request::{request_from_env, snapshot_from_env};
pub use summary::RequestSummary;

#[cfg(test)]
mod tests;
