//! CGI環境でのエントリポイント
//!
//! 環境変数と標準入力から構築したリクエストをJSONで標準出力に書き出す。

use env_logger::Env;
use log::{error, info};
use httpenv::cgi::{request_from_env, RequestSummary};

fn main() {
    // CGIでは標準出力を結果に使うため、ログは標準エラー出力に出す
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let request = match request_from_env() {
        Ok(request) => request,
        Err(err) => {
            error!("Failed to build request from environment: {}", err);
            std::process::exit(1);
        }
    };
    info!("{} {}", request.method().token(), request.path());

    match serde_json::to_string_pretty(&RequestSummary::from(&request)) {
        Ok(json) => println!("{}", json),
        Err(err) => {
            error!("Failed to serialize request summary: {}", err);
            std::process::exit(1);
        }
    }
}
