//! HTTPクッキー関連の実装
//!
//! 受信したCookieは [`ReadOnlyCookie`]、送信するCookieは [`Cookie`] で表す。
//! 名前や値の文字種は検証しない（シリアライズ側の責務）。

use chrono::{DateTime, Duration, Utc};
use super::traits::{HttpCookie, WriteableCookie};

/// 有効期限を省略した場合の日数
pub const DEFAULT_LIFETIME_DAYS: i64 = 30;

/// パスを省略した場合の値
pub const DEFAULT_PATH: &str = "/";

/// リクエストで受信したCookie
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReadOnlyCookie {
    name: String,
    value: String,
}

impl ReadOnlyCookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl HttpCookie for ReadOnlyCookie {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> &str {
        &self.value
    }
}

/// レスポンスでクライアントへ送るCookie
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    name: String,
    value: String,
    expire: DateTime<Utc>,
    path: String,
}

impl Cookie {
    /// 新しいクッキーを作成（有効期限は30日後、パスは "/"）
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::with_options(name, value, None, None)
    }

    /// 有効期限とパスを指定して作成
    ///
    /// `expire` が `None` なら現在時刻から30日後、`path` が `None` または空なら "/"。
    pub fn with_options(
        name: impl Into<String>,
        value: impl Into<String>,
        expire: Option<DateTime<Utc>>,
        path: Option<String>,
    ) -> Self {
        let path = match path {
            Some(p) if !p.is_empty() => p,
            _ => DEFAULT_PATH.to_string(),
        };

        Self {
            name: name.into(),
            value: value.into(),
            expire: expire.unwrap_or_else(default_expire),
            path,
        }
    }

    /// 有効期限だけを差し替えた新しいCookieを返す
    pub fn with_expire(self, expire: DateTime<Utc>) -> Self {
        Self { expire, ..self }
    }

    /// パスだけを差し替えた新しいCookieを返す（空なら "/"）
    pub fn with_path(self, path: impl Into<String>) -> Self {
        Self::with_options(self.name, self.value, Some(self.expire), Some(path.into()))
    }
}

fn default_expire() -> DateTime<Utc> {
    Utc::now() + Duration::days(DEFAULT_LIFETIME_DAYS)
}

impl HttpCookie for Cookie {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> &str {
        &self.value
    }
}

impl WriteableCookie for Cookie {
    fn expire(&self) -> DateTime<Utc> {
        self.expire
    }

    fn path(&self) -> &str {
        &self.path
    }
}
