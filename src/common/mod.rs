//! 共通の値型とユーティリティ

pub mod cookie;
pub mod http;
pub mod map;
pub mod traits;
pub mod utils;

pub use cookie::{Cookie, ReadOnlyCookie};
pub use http::{Method, StatusCode};
pub use map::{flatten, StringMap};
pub use traits::{HttpCookie, UploadFile, WriteableCookie};
pub use utils::{get_max_body_size, parse_cookie_header, parse_query_string, percent_decode};
