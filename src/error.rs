//! エラー型の定義

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// ライブラリ共通のエラー型
#[derive(Error, Debug)]
pub enum Error {
    /// 利用できない引数（不正なストリーム、書き込めない移動先など）
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// アップロードファイルが既に移動済み
    #[error("{0}")]
    AlreadyMoved(String),

    /// アップロードファイルの移動に失敗
    #[error("An error occurred at moving uploaded file {from:?} to {to:?}: {source}")]
    MoveFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// リクエストボディが上限を超えている
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// ストリームやファイルの読み込みエラー
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// 引数が原因のエラーかどうか
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument(_) | Error::PayloadTooLarge(_))
    }

    /// オブジェクトの状態や実行環境が原因のエラーかどうか
    pub fn is_state_error(&self) -> bool {
        matches!(
            self,
            Error::AlreadyMoved(_) | Error::MoveFailed { .. } | Error::Io(_)
        )
    }
}
