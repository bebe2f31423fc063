//! httpenv: サーバー環境から構築するHTTPリクエスト/レスポンスの値オブジェクト
//!
//! ホスト側ランタイム（CGIやアプリケーションサーバー）が用意した環境変数の
//! スナップショット、引数、Cookie、アップロードメタデータ、ボディストリームから
//! 不変の [`Request`] を構築し、[`Response`] にステータス・ヘッダー・ボディ・
//! 送信Cookieを蓄積する。

pub mod common;
pub mod error;
pub mod request;
pub mod response;
pub mod upload;

#[cfg(feature = "cgi")]
pub mod cgi;

pub use common::*;
pub use error::Error;
pub use request::{Request, RequestBuilder};
pub use response::Response;
pub use upload::{FileMeta, UploadedFile};
