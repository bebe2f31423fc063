//! Cookieとアップロードファイルの能力を表すトレイト定義

use std::path::Path;

use chrono::{DateTime, Utc};

use crate::error::Error;

/// すべてのCookieが持つ名前と値
pub trait HttpCookie {
    /// Cookie名を取得
    fn name(&self) -> &str;

    /// Cookieの値を取得
    fn value(&self) -> &str;
}

/// レスポンスに設定できる書き込み可能なCookie
pub trait WriteableCookie: HttpCookie {
    /// 有効期限を取得
    fn expire(&self) -> DateTime<Utc>;

    /// Cookieのパスを取得
    fn path(&self) -> &str;
}

/// 受信済みのアップロードファイル
pub trait UploadFile {
    /// フォームのフィールド名
    fn field(&self) -> &str;

    /// クライアント側のファイル名
    fn name(&self) -> &str;

    /// 一時ファイルのパス
    fn file(&self) -> &Path;

    fn size(&self) -> u64;

    /// 内容から判定したMIMEタイプ
    fn mime_type(&self) -> &str;

    /// ファイルを指定先へ移動する（一度だけ成功する）
    fn move_to(&self, destination: &Path) -> Result<(), Error>;
}
