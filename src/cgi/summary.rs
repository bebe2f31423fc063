//! 導出したリクエストのJSON表現

use indexmap::IndexMap;
use serde::Serialize;

use crate::common::{HttpCookie, StringMap};
use crate::request::Request;

/// リクエストから導出された値をまとめたもの
#[derive(Debug, Serialize)]
pub struct RequestSummary {
    pub method: String,
    pub path: String,
    pub headers: IndexMap<String, String>,
    pub arguments: IndexMap<String, String>,
    pub cookies: IndexMap<String, String>,
    pub host_name: String,
    pub port: u32,
    pub remote_ip_address: String,
    pub secure: bool,
    pub xml_http_request: bool,
}

fn to_index_map(map: &StringMap) -> IndexMap<String, String> {
    map.iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl From<&Request> for RequestSummary {
    fn from(request: &Request) -> Self {
        Self {
            method: request.method().token().to_string(),
            path: request.path().to_string(),
            headers: to_index_map(request.headers()),
            arguments: to_index_map(request.arguments()),
            cookies: request
                .cookies()
                .iter()
                .map(|c| (c.name().to_string(), c.value().to_string()))
                .collect(),
            host_name: request.host_name().to_string(),
            port: request.port(),
            remote_ip_address: request.remote_ip_address().to_string(),
            secure: request.is_secure(),
            xml_http_request: request.is_xml_http_request(),
        }
    }
}
