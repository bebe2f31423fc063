//! サーバー環境から構築するHTTPリクエスト
//!
//! [`Request`] は構築後は不変で、ボディだけが初回アクセス時に読み込まれて
//! キャッシュされる。

pub mod builder;
pub mod derive;

use std::borrow::Cow;
use std::fmt;
use std::io::{self, Read};
use std::sync::{Arc, Mutex, OnceLock};

use log::{debug, warn};

use crate::common::{HttpCookie, Method, ReadOnlyCookie, StringMap};
use crate::error::Error;
use crate::response::Response;
use crate::upload::UploadedFile;

pub use builder::RequestBuilder;
pub use derive::Snapshot;

/// ボディを読み出すストリーム
pub type BodyStream = Box<dyn Read + Send>;

/// 読み込み失敗の記録
///
/// `io::Error` は複製できないため、種別とメッセージだけを保持する。
#[derive(Debug)]
struct ReadFailure {
    kind: io::ErrorKind,
    message: String,
}

impl ReadFailure {
    fn to_error(&self) -> Error {
        Error::Io(io::Error::new(self.kind, self.message.clone()))
    }
}

/// 読み込み結果（成功時の内容、または最初の失敗）
type BodyState = Result<Vec<u8>, ReadFailure>;

/// 一度だけ読み込まれるリクエストボディ
///
/// 読み込みに失敗した場合もその結果を確定させ、以降は同じエラーを返す。
struct Body {
    stream: Mutex<Option<BodyStream>>,
    state: OnceLock<BodyState>,
}

impl Body {
    fn new(stream: BodyStream) -> Self {
        Self {
            stream: Mutex::new(Some(stream)),
            state: OnceLock::new(),
        }
    }

    fn get(&self) -> Result<&[u8], Error> {
        let state = match self.state.get() {
            Some(state) => state,
            None => self.read(),
        };
        match state {
            Ok(content) => Ok(content.as_slice()),
            Err(failure) => Err(failure.to_error()),
        }
    }

    fn read(&self) -> &BodyState {
        // ロック中に他スレッドが読み終えていればそれを返す
        let mut guard = self
            .stream
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(state) = self.state.get() {
            return state;
        }

        let mut buffer = Vec::new();
        let state = match guard.take() {
            Some(mut stream) => match stream.read_to_end(&mut buffer) {
                Ok(_) => {
                    debug!("Read {} bytes of request body", buffer.len());
                    Ok(buffer)
                }
                Err(err) => {
                    warn!(
                        "Reading request body failed after {} bytes: {}",
                        buffer.len(),
                        err
                    );
                    Err(ReadFailure {
                        kind: err.kind(),
                        message: err.to_string(),
                    })
                }
            },
            None => Ok(buffer),
        };

        self.state.get_or_init(|| state)
    }
}

/// HTTPリクエスト
pub struct Request {
    method: Method,
    headers: StringMap,
    path: String,
    arguments: StringMap,
    payload_arguments: StringMap,
    cookies: Vec<ReadOnlyCookie>,
    uploaded_files: Vec<UploadedFile>,
    host_name: String,
    port: u32,
    remote_ip_address: String,
    secure: bool,
    server: Snapshot,
    body: Body,
}

impl Request {
    /// RequestBuilderを作成
    pub fn builder() -> RequestBuilder {
        RequestBuilder::new()
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// リクエストヘッダー（`Accept-Language` 形式のキー）
    pub fn headers(&self) -> &StringMap {
        &self.headers
    }

    /// クエリ引数
    pub fn arguments(&self) -> &StringMap {
        &self.arguments
    }

    /// ボディ引数
    pub fn payload_arguments(&self) -> &StringMap {
        &self.payload_arguments
    }

    /// フロントコントローラー部分を取り除いたリクエストパス（常に `/` 始まり）
    pub fn path(&self) -> &str {
        &self.path
    }

    /// 受信したCookie（入力順）
    pub fn cookies(&self) -> &[ReadOnlyCookie] {
        &self.cookies
    }

    /// 名前でCookieを探す
    pub fn cookie(&self, name: &str) -> Option<&ReadOnlyCookie> {
        self.cookies.iter().find(|c| c.name() == name)
    }

    /// 正常にアップロードされたファイル
    pub fn uploaded_files(&self) -> &[UploadedFile] {
        &self.uploaded_files
    }

    pub fn host_name(&self) -> &str {
        &self.host_name
    }

    pub fn port(&self) -> u32 {
        self.port
    }

    pub fn remote_ip_address(&self) -> &str {
        &self.remote_ip_address
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }

    /// `X-Requested-With: XMLHttpRequest` が付いているか
    pub fn is_xml_http_request(&self) -> bool {
        self.headers.try_get("X-Requested-With", "") == "XMLHttpRequest"
    }

    /// 構築に使ったサーバー環境変数を取得
    pub fn server_var(&self, key: &str) -> Option<&str> {
        self.server.get(key).map(String::as_str)
    }

    /// ボディのバイト列
    ///
    /// 初回呼び出しでストリームを最後まで読み、以降はキャッシュを返す。
    /// 初回の読み込みが失敗した場合は、以降も同じエラーを返す。
    pub fn content_bytes(&self) -> Result<&[u8], Error> {
        self.body.get()
    }

    /// ボディ文字列（不正なUTF-8は置換される）
    pub fn content(&self) -> Result<Cow<'_, str>, Error> {
        self.content_bytes().map(String::from_utf8_lossy)
    }

    /// このリクエストに対するレスポンスを作成
    pub fn create_response(self: &Arc<Self>) -> Response {
        Response::new(Arc::clone(self))
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("headers", &self.headers)
            .field("arguments", &self.arguments)
            .field("payload_arguments", &self.payload_arguments)
            .field("cookies", &self.cookies)
            .field("uploaded_files", &self.uploaded_files)
            .field("host_name", &self.host_name)
            .field("port", &self.port)
            .field("remote_ip_address", &self.remote_ip_address)
            .field("secure", &self.secure)
            .finish_non_exhaustive()
    }
}
