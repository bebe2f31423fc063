//! HTTPレスポンス
//!
//! ステータスコード、ヘッダー、ボディ、送信するCookieを蓄積するだけで、
//! 実際の送信形式への変換は行わない。

use std::sync::Arc;
use indexmap::IndexMap;

use crate::common::{Cookie, HttpCookie, StringMap};
use crate::request::Request;

/// HTTPレスポンス
#[derive(Debug)]
pub struct Response {
    request: Arc<Request>,
    status_code: u16,
    headers: StringMap,
    content: String,
    cookies: IndexMap<String, Cookie>,
}

impl Response {
    /// リクエストに対する新しいレスポンスを作成（200、空ボディ）
    pub fn new(request: Arc<Request>) -> Self {
        Self {
            request,
            status_code: 200,
            headers: StringMap::new(),
            content: String::new(),
            cookies: IndexMap::new(),
        }
    }

    /// このレスポンスを作成したリクエスト
    pub fn request(&self) -> &Arc<Request> {
        &self.request
    }

    /// ステータスコードを設定
    pub fn set_status_code(&mut self, status: impl Into<u16>) -> &mut Self {
        self.status_code = status.into();
        self
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// ボディを設定
    pub fn set_content(&mut self, content: impl Into<String>) -> &mut Self {
        self.content = content.into();
        self
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn headers(&self) -> &StringMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut StringMap {
        &mut self.headers
    }

    /// ヘッダーを設定
    pub fn set_header(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.headers.set(key, value);
        self
    }

    /// 送信するCookieを追加する
    ///
    /// 同じ名前のCookieが既にあれば、位置はそのままで値だけ置き換える。
    pub fn add_cookie(&mut self, cookie: Cookie) -> &mut Self {
        self.cookies.insert(cookie.name().to_string(), cookie);
        self
    }

    /// 送信するCookie（最初に追加された順）
    pub fn cookies(&self) -> Vec<&Cookie> {
        self.cookies.values().collect()
    }
}
