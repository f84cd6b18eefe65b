//! Select (search) query

use super::{Query, QueryType, ResponseHeader};
use crate::client::request::Request;
use crate::error::{Error, Result};
use serde::Deserialize;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Search query sent to the `select` handler as a GET request
#[derive(Debug, Clone)]
pub struct SelectQuery {
    query: String,
    start: u32,
    rows: u32,
    fields: Vec<String>,
    sorts: Vec<(String, SortOrder)>,
    filter_queries: Vec<String>,
}

impl SelectQuery {
    /// Create a query matching all documents
    pub fn new() -> Self {
        Self {
            query: "*:*".to_string(),
            start: 0,
            rows: 10,
            fields: vec!["*".to_string(), "score".to_string()],
            sorts: Vec::new(),
            filter_queries: Vec::new(),
        }
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn start(mut self, start: u32) -> Self {
        self.start = start;
        self
    }

    pub fn rows(mut self, rows: u32) -> Self {
        self.rows = rows;
        self
    }

    /// Replace the returned field list
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sorts.push((field.into(), order));
        self
    }

    pub fn filter_query(mut self, fq: impl Into<String>) -> Self {
        self.filter_queries.push(fq.into());
        self
    }
}

impl Default for SelectQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl Query for SelectQuery {
    fn query_type(&self) -> QueryType {
        QueryType::Select
    }

    fn handler(&self) -> &str {
        "select"
    }

    fn build_request(&self) -> Result<Request> {
        if self.query.trim().is_empty() {
            return Err(Error::InvalidQuery {
                message: "select query string is empty".to_string(),
            });
        }

        let mut request = Request::get(self.handler())
            .param("q", &self.query)
            .param("start", self.start.to_string())
            .param("rows", self.rows.to_string());

        if !self.fields.is_empty() {
            request.add_param("fl", self.fields.join(","));
        }

        if !self.sorts.is_empty() {
            let sort = self
                .sorts
                .iter()
                .map(|(field, order)| format!("{} {}", field, order.as_str()))
                .collect::<Vec<_>>()
                .join(",");
            request.add_param("sort", sort);
        }

        for fq in &self.filter_queries {
            request.add_param("fq", fq);
        }

        Ok(request.param("wt", "json"))
    }
}

/// Decoded select response
#[derive(Debug, Clone, Deserialize)]
pub struct SelectResult {
    #[serde(rename = "responseHeader", default)]
    pub header: ResponseHeader,
    #[serde(rename = "response")]
    pub documents: DocumentList,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DocumentList {
    #[serde(rename = "numFound")]
    pub num_found: u64,
    pub start: u64,
    pub docs: Vec<serde_json::Map<String, serde_json::Value>>,
}

impl SelectResult {
    pub fn num_found(&self) -> u64 {
        self.documents.num_found
    }

    pub fn docs(&self) -> &[serde_json::Map<String, serde_json::Value>] {
        &self.documents.docs
    }
}
