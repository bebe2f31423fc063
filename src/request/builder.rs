//! Requestを組み立てるためのビルダー

use std::io::Read;
use indexmap::IndexMap;
use serde_json::Value;

use crate::common::{flatten, ReadOnlyCookie, StringMap};
use crate::error::Error;
use crate::upload::{collect_uploads, FileMeta};
use super::derive::{self, Snapshot};
use super::{BodyStream, Request};

/// ホスト側ランタイムから渡される入力を集めて [`Request`] を構築する
#[derive(Default)]
pub struct RequestBuilder {
    server: Snapshot,
    query: StringMap,
    payload: StringMap,
    cookies: StringMap,
    files: IndexMap<String, FileMeta>,
    stream: Option<BodyStream>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// サーバー環境変数を1つ追加
    pub fn server_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.server.insert(key.into(), value.into());
        self
    }

    /// サーバー環境変数をまとめて追加（順序はイテレータの順）
    pub fn server_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.server
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// ネストしたクエリ引数を設定（`--` 区切りで平坦化される）
    pub fn query(mut self, value: &Value) -> Self {
        self.query = flatten(value);
        self
    }

    /// 平坦なクエリ引数を設定
    pub fn query_args<I, K, V>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query = args.into_iter().collect();
        self
    }

    /// ネストしたボディ引数を設定
    pub fn body_args(mut self, value: &Value) -> Self {
        self.payload = flatten(value);
        self
    }

    /// 平坦なボディ引数を設定
    pub fn payload<I, K, V>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.payload = args.into_iter().collect();
        self
    }

    /// ネストしたCookieを設定
    pub fn cookies(mut self, value: &Value) -> Self {
        self.cookies = flatten(value);
        self
    }

    /// Cookieを1つ追加
    pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.set(name, value);
        self
    }

    /// アップロードメタデータをまとめて設定
    pub fn files(mut self, files: IndexMap<String, FileMeta>) -> Self {
        self.files = files;
        self
    }

    /// アップロードメタデータを1フィールド追加
    pub fn file_field(mut self, field: impl Into<String>, meta: FileMeta) -> Self {
        self.files.insert(field.into(), meta);
        self
    }

    /// リクエストボディを読み出すストリームを設定
    pub fn body_stream<R>(mut self, stream: R) -> Self
    where
        R: Read + Send + 'static,
    {
        self.stream = Some(Box::new(stream));
        self
    }

    /// リクエストを構築する
    ///
    /// ボディストリームが設定されていなければ `Error::InvalidArgument`。
    /// アップロードの一時ファイルを読めなければ `Error::Io`。
    /// ボディはここでは読まない。
    pub fn build(self) -> Result<Request, Error> {
        let stream = self
            .stream
            .ok_or_else(|| Error::InvalidArgument("No valid stream passed.".to_string()))?;

        let server = self.server;
        let uploaded_files = collect_uploads(&self.files)?;
        let cookies = self
            .cookies
            .iter()
            .map(|(name, value)| ReadOnlyCookie::new(name, value))
            .collect();

        Ok(Request {
            method: derive::method(&server),
            headers: derive::headers(&server),
            path: derive::path(&server),
            arguments: self.query,
            payload_arguments: self.payload,
            cookies,
            uploaded_files,
            host_name: derive::host_name(&server),
            port: derive::port(&server),
            remote_ip_address: derive::remote_ip_address(&server),
            secure: derive::is_secure(&server),
            server,
            body: super::Body::new(stream),
        })
    }
}
