//! Ping query

use super::{Query, QueryType, ResponseHeader};
use crate::client::request::Request;
use crate::error::Result;
use serde::Deserialize;

/// Health check against the `admin/ping` handler
#[derive(Debug, Clone, Default)]
pub struct PingQuery;

impl PingQuery {
    pub fn new() -> Self {
        Self
    }
}

impl Query for PingQuery {
    fn query_type(&self) -> QueryType {
        QueryType::Ping
    }

    fn handler(&self) -> &str {
        "admin/ping"
    }

    fn build_request(&self) -> Result<Request> {
        Ok(Request::get(self.handler()).param("wt", "json"))
    }
}

/// Decoded ping response
#[derive(Debug, Clone, Deserialize)]
pub struct PingResult {
    #[serde(rename = "responseHeader", default)]
    pub header: ResponseHeader,
    #[serde(default)]
    pub status: String,
}

impl PingResult {
    pub fn is_ok(&self) -> bool {
        self.status == "OK"
    }
}
