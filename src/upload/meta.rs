//! アップロードメタデータ（フィールドごとの name / tmp_name / error / size）

use std::fmt;
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use super::file::UploadedFile;

/// 成功を表すアップロードエラーコード
pub const UPLOAD_ERR_OK: i64 = 0;

/// 単一ファイルならスカラー、複数ファイルなら配列
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    fn get(&self, index: usize) -> Option<&T> {
        match self {
            OneOrMany::One(v) if index == 0 => Some(v),
            OneOrMany::One(_) => None,
            OneOrMany::Many(list) => list.get(index),
        }
    }
}

impl<T: Default> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::One(T::default())
    }
}

/// 1フィールド分のアップロードメタデータ
///
/// `type` はクライアント申告値のため読み込むだけで使用しない。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMeta {
    pub name: OneOrMany<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub client_type: Option<OneOrMany<String>>,
    pub tmp_name: OneOrMany<String>,
    pub error: OneOrMany<i64>,
    #[serde(default)]
    pub size: OneOrMany<u64>,
}

impl FileMeta {
    /// 単一ファイルのメタデータを作成
    pub fn single(name: impl Into<String>, tmp_name: impl Into<String>, error: i64, size: u64) -> Self {
        Self {
            name: OneOrMany::One(name.into()),
            client_type: None,
            tmp_name: OneOrMany::One(tmp_name.into()),
            error: OneOrMany::One(error),
            size: OneOrMany::One(size),
        }
    }

    /// 複数ファイルのメタデータを作成（各リストは同じ長さであること）
    pub fn multiple<N, T>(names: N, tmp_names: T, errors: Vec<i64>, sizes: Vec<u64>) -> Self
    where
        N: IntoIterator,
        N::Item: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
    {
        Self {
            name: OneOrMany::Many(names.into_iter().map(Into::into).collect()),
            client_type: None,
            tmp_name: OneOrMany::Many(tmp_names.into_iter().map(Into::into).collect()),
            error: OneOrMany::Many(errors),
            size: OneOrMany::Many(sizes),
        }
    }

    /// 複数ファイル形式かどうか（`name` が配列かで判定）
    pub fn is_multiple(&self) -> bool {
        matches!(self.name, OneOrMany::Many(_))
    }

    fn entry_count(&self) -> usize {
        match &self.name {
            OneOrMany::One(_) => 1,
            OneOrMany::Many(list) => list.len(),
        }
    }
}

/// アップロードエラーコード
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    Ok,
    IniSize,
    FormSize,
    Partial,
    NoFile,
    NoTmpDir,
    CantWrite,
    Extension,
    Unknown(i64),
}

impl UploadStatus {
    pub fn from_code(code: i64) -> Self {
        match code {
            UPLOAD_ERR_OK => UploadStatus::Ok,
            1 => UploadStatus::IniSize,
            2 => UploadStatus::FormSize,
            3 => UploadStatus::Partial,
            4 => UploadStatus::NoFile,
            6 => UploadStatus::NoTmpDir,
            7 => UploadStatus::CantWrite,
            8 => UploadStatus::Extension,
            other => UploadStatus::Unknown(other),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, UploadStatus::Ok)
    }
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadStatus::Ok => write!(f, "uploaded successfully"),
            UploadStatus::IniSize => write!(f, "exceeds the server size limit"),
            UploadStatus::FormSize => write!(f, "exceeds the form size limit"),
            UploadStatus::Partial => write!(f, "only partially uploaded"),
            UploadStatus::NoFile => write!(f, "no file was uploaded"),
            UploadStatus::NoTmpDir => write!(f, "missing temporary folder"),
            UploadStatus::CantWrite => write!(f, "failed to write file to disk"),
            UploadStatus::Extension => write!(f, "stopped by an extension"),
            UploadStatus::Unknown(code) => write!(f, "unknown upload error code {}", code),
        }
    }
}

/// メタデータから成功したアップロードだけを `UploadedFile` として取り出す
///
/// フィールドの順、フィールド内ではインデックス順に並ぶ。
pub fn collect_uploads(files: &IndexMap<String, FileMeta>) -> Result<Vec<UploadedFile>, Error> {
    let mut uploads = Vec::new();

    for (field, meta) in files {
        for index in 0..meta.entry_count() {
            let (Some(name), Some(tmp_name), Some(&code)) = (
                meta.name.get(index),
                meta.tmp_name.get(index),
                meta.error.get(index),
            ) else {
                debug!("Skipping upload {}[{}]: incomplete metadata", field, index);
                continue;
            };

            let status = UploadStatus::from_code(code);
            if !status.is_ok() {
                debug!("Skipping upload {}[{}] ({:?}): {}", field, index, name, status);
                continue;
            }

            let size = meta.size.get(index).copied().unwrap_or(0);
            uploads.push(UploadedFile::new(field.as_str(), name.as_str(), tmp_name.as_str(), size)?);
        }
    }

    Ok(uploads)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_with(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[test]
    fn test_deserialize_single_and_multiple() {
        let json = r#"{
            "single": {"name": "cv.pdf", "type": "application/pdf", "tmp_name": "/tmp/a", "error": 0, "size": 10},
            "multi": {"name": ["a", "b"], "type": ["x", "y"], "tmp_name": ["/tmp/b", "/tmp/c"], "error": [0, 4], "size": [1, 0]}
        }"#;
        let files: IndexMap<String, FileMeta> = serde_json::from_str(json).unwrap();

        assert!(!files["single"].is_multiple());
        assert!(files["multi"].is_multiple());
        assert_eq!(files["multi"].error, OneOrMany::Many(vec![0, 4]));
        assert_eq!(files.keys().collect::<Vec<_>>(), vec!["single", "multi"]);
    }

    #[test]
    fn test_upload_status() {
        assert!(UploadStatus::from_code(0).is_ok());
        assert_eq!(UploadStatus::from_code(4), UploadStatus::NoFile);
        assert_eq!(UploadStatus::from_code(5), UploadStatus::Unknown(5));
        assert_eq!(UploadStatus::from_code(1).to_string(), "exceeds the server size limit");
    }

    #[test]
    fn test_collect_uploads_skips_failed_entries() {
        let single = temp_with(b"<html>");
        let multi_a = temp_with(b"foobar");
        let multi_b = temp_with(b"foobaz");

        let mut files = IndexMap::new();
        files.insert(
            "singlefile".to_string(),
            FileMeta::single("cv.pdf", single.path().to_string_lossy(), 0, 65926),
        );
        files.insert(
            "multifile".to_string(),
            FileMeta::multiple(
                ["cv.odt", "picture.png", "picture.jpg"],
                [
                    multi_a.path().to_string_lossy().into_owned(),
                    multi_b.path().to_string_lossy().into_owned(),
                    "no upload".to_string(),
                ],
                vec![0, 0, 1],
                vec![43402, 242685, 0],
            ),
        );

        let uploads = collect_uploads(&files).unwrap();
        assert_eq!(uploads.len(), 3);
        let names: Vec<&str> = uploads.iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["cv.pdf", "cv.odt", "picture.png"]);
        assert_eq!(uploads[0].mime_type(), "text/html");
        assert_eq!(uploads[2].size(), 242685);
    }

    #[test]
    fn test_collect_uploads_failed_single_and_short_lists() {
        let ok = temp_with(b"data");

        let mut files = IndexMap::new();
        files.insert("failed".to_string(), FileMeta::single("x.txt", "missing", 4, 0));
        // tmp_nameが足りない2件目はスキップ
        files.insert(
            "uneven".to_string(),
            FileMeta::multiple(
                ["a.txt", "b.txt"],
                [ok.path().to_string_lossy().into_owned()],
                vec![0, 0],
                vec![4, 4],
            ),
        );

        let uploads = collect_uploads(&files).unwrap();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].field(), "uneven");
        assert_eq!(uploads[0].name(), "a.txt");
    }

    #[test]
    fn test_collect_uploads_unreadable_temp_file() {
        let mut files = IndexMap::new();
        files.insert(
            "broken".to_string(),
            FileMeta::single("x.txt", "/nonexistent/httpenv-upload", 0, 1),
        );

        let err = collect_uploads(&files).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
