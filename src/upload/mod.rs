//! アップロードファイルの表現とメタデータの解釈

pub mod file;
pub mod meta;
pub mod sniff;

pub use file::UploadedFile;
pub use meta::{collect_uploads, FileMeta, OneOrMany, UploadStatus, UPLOAD_ERR_OK};
pub use sniff::detect_mime_type;
