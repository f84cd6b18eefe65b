//! Queries understood by the search client
//!
//! A query only has to know how to turn itself into a [`Request`]; the
//! client and dispatcher never look inside it otherwise.

mod extract;
mod ping;
mod select;
mod update;

pub use extract::ExtractQuery;
pub use ping::{PingQuery, PingResult};
pub use select::{DocumentList, SelectQuery, SelectResult, SortOrder};
pub use update::{Document, UpdateQuery, UpdateResult};

use crate::client::request::Request;
use crate::error::Result;
use serde::Deserialize;

/// Kind of query, mostly useful for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryType {
    Select,
    Ping,
    Update,
    Extract,
}

impl QueryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Ping => "ping",
            Self::Update => "update",
            Self::Extract => "extract",
        }
    }
}

impl std::fmt::Display for QueryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main query trait that every query type implements
pub trait Query: Send + Sync {
    /// Query type
    fn query_type(&self) -> QueryType;

    /// Request handler relative to the endpoint, e.g. `select`
    fn handler(&self) -> &str;

    /// Build the generic request for this query
    fn build_request(&self) -> Result<Request>;
}

/// `responseHeader` block present in every JSON response
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResponseHeader {
    pub status: i64,
    #[serde(rename = "QTime")]
    pub query_time: i64,
}
