//! Generic request built by queries

use std::fmt;
use std::path::{Path, PathBuf};

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Head,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Head => "HEAD",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request produced by a query, independent of any HTTP library.
///
/// Headers are kept as raw `"Name: value"` lines in the order they were
/// added. Params are multi-valued and ordered; `uri()` renders them as a
/// urlencoded query string after the handler.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// HTTP method
    pub method: HttpMethod,
    /// Request handler, relative to the endpoint base URI (e.g. `select`)
    pub handler: String,
    /// Query string parameters
    pub params: Vec<(String, String)>,
    /// Raw header lines
    pub headers: Vec<String>,
    /// Raw POST payload
    pub raw_data: Option<Vec<u8>>,
    /// File to stream as the POST payload
    pub file_upload: Option<PathBuf>,
}

impl Request {
    /// Create a request for the given method and handler
    pub fn new(method: HttpMethod, handler: impl Into<String>) -> Self {
        Self {
            method,
            handler: handler.into(),
            params: Vec::new(),
            headers: Vec::new(),
            raw_data: None,
            file_upload: None,
        }
    }

    /// Create a GET request
    pub fn get(handler: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, handler)
    }

    /// Create a POST request
    pub fn post(handler: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, handler)
    }

    /// Append a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_param(key, value);
        self
    }

    pub fn add_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.push((key.into(), value.into()));
    }

    /// Append a raw header line
    pub fn header(mut self, line: impl Into<String>) -> Self {
        self.headers.push(line.into());
        self
    }

    /// Set the raw POST payload
    pub fn raw_data(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.raw_data = Some(data.into());
        self
    }

    /// Stream the given file as the POST payload
    pub fn file_upload(mut self, path: impl AsRef<Path>) -> Self {
        self.file_upload = Some(path.as_ref().to_path_buf());
        self
    }

    /// Handler plus urlencoded query string
    pub fn uri(&self) -> String {
        if self.params.is_empty() {
            return self.handler.clone();
        }

        let query = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.iter())
            .finish();

        format!("{}?{}", self.handler, query)
    }
}
