//! 受信済みのアップロードファイル

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, warn};

use crate::common::UploadFile;
use crate::error::Error;
use super::sniff::{detect_mime_type, SNIFF_LEN};

/// 一時ディレクトリに保存済みのアップロードファイル
///
/// MIMEタイプは生成時にファイル内容から一度だけ判定する。
/// `move_to` は一度しか成功しない。
#[derive(Debug)]
pub struct UploadedFile {
    field: String,
    name: String,
    file: PathBuf,
    size: u64,
    mime_type: String,
    moved: AtomicBool,
}

impl UploadedFile {
    /// アップロードファイルを作成する
    ///
    /// 一時ファイルを読めない場合は `Error::Io` を返す。
    pub fn new(
        field: impl Into<String>,
        name: impl Into<String>,
        file: impl Into<PathBuf>,
        size: u64,
    ) -> Result<Self, Error> {
        let file = file.into();
        let mime_type = sniff_file(&file)?.to_string();

        Ok(Self {
            field: field.into(),
            name: name.into(),
            file,
            size,
            mime_type,
            moved: AtomicBool::new(false),
        })
    }

    /// アップロードしたフォームのフィールド名
    pub fn field(&self) -> &str {
        &self.field
    }

    /// クライアント側のファイル名
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 一時ファイルのパス
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// クライアントが申告したサイズ（バイト）
    pub fn size(&self) -> u64 {
        self.size
    }

    /// 内容から判定したMIMEタイプ
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn is_moved(&self) -> bool {
        self.moved.load(Ordering::Acquire)
    }

    /// ファイルを指定先へ移動する
    ///
    /// - 既に移動済みなら `Error::AlreadyMoved`
    /// - 移動先ディレクトリに書き込めなければ `Error::InvalidArgument`
    /// - 移動自体に失敗したら `Error::MoveFailed`
    ///
    /// 失敗した移動は再試行しないこと（ファイルシステムの状態が変わっている可能性がある）。
    pub fn move_to(&self, destination: impl AsRef<Path>) -> Result<&Self, Error> {
        let destination = destination.as_ref();

        // 同時に呼ばれても移動を試みるのは一度だけ
        if self
            .moved
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(Error::AlreadyMoved(format!(
                "Uploaded file \"{}\" is already moved.",
                self.name
            )));
        }

        let result = self.relocate(destination);
        if result.is_err() {
            self.moved.store(false, Ordering::Release);
        }
        result.map(|()| self)
    }

    fn relocate(&self, destination: &Path) -> Result<(), Error> {
        if !is_writable_dir(parent_dir(destination)) {
            return Err(Error::InvalidArgument(format!(
                "Upload target path \"{}\" is not writable.",
                destination.display()
            )));
        }

        match fs::rename(&self.file, destination) {
            Ok(()) => {
                debug!("Moved uploaded file {:?} to {:?}", self.file, destination);
                Ok(())
            }
            Err(rename_err) => {
                // 一時ディレクトリが別デバイスの場合はコピーして削除する
                warn!(
                    "rename of uploaded file {:?} failed ({}), falling back to copy",
                    self.file, rename_err
                );
                copy_and_remove(&self.file, destination).map_err(|source| Error::MoveFailed {
                    from: self.file.clone(),
                    to: destination.to_path_buf(),
                    source,
                })
            }
        }
    }
}

impl UploadFile for UploadedFile {
    fn field(&self) -> &str {
        UploadedFile::field(self)
    }

    fn name(&self) -> &str {
        UploadedFile::name(self)
    }

    fn file(&self) -> &Path {
        UploadedFile::file(self)
    }

    fn size(&self) -> u64 {
        UploadedFile::size(self)
    }

    fn mime_type(&self) -> &str {
        UploadedFile::mime_type(self)
    }

    fn move_to(&self, destination: &Path) -> Result<(), Error> {
        UploadedFile::move_to(self, destination).map(|_| ())
    }
}

fn sniff_file(path: &Path) -> Result<&'static str, Error> {
    let mut head = Vec::with_capacity(SNIFF_LEN);
    File::open(path)?
        .take(SNIFF_LEN as u64)
        .read_to_end(&mut head)?;
    Ok(detect_mime_type(&head))
}

fn parent_dir(destination: &Path) -> &Path {
    match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// 実際にファイルを作成できるかで書き込み可否を判定する
///
/// パーミッションビットだけでは所有者やACLを考慮できない。
fn is_writable_dir(dir: &Path) -> bool {
    if !fs::metadata(dir).map(|meta| meta.is_dir()).unwrap_or(false) {
        return false;
    }
    match tempfile::Builder::new().prefix(".httpenv-").tempfile_in(dir) {
        Ok(_) => true,
        Err(err) => {
            debug!("Directory {:?} is not writable: {}", dir, err);
            false
        }
    }
}

/// コピーしてから元ファイルを削除する
///
/// コピーが成功した時点で移動済みとみなす。元ファイルを消せなかった場合は警告のみ。
fn copy_and_remove(from: &Path, to: &Path) -> io::Result<()> {
    fs::copy(from, to)?;
    if let Err(err) = fs::remove_file(from) {
        warn!("Copied uploaded file {:?} to {:?} but could not remove the source: {}", from, to, err);
    }
    Ok(())
}
