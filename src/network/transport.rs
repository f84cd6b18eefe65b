//! Async HTTP transport abstraction

use crate::client::HttpMethod;
use crate::error::Result;
use async_trait::async_trait;
use std::fs::File;

/// Request body handed to a transport
#[derive(Debug, Default)]
pub enum TransportBody {
    #[default]
    Empty,
    Bytes(Vec<u8>),
    /// Open file streamed as the payload
    File(File),
}

impl TransportBody {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// HTTP request in the transport's native shape
#[derive(Debug)]
pub struct TransportRequest {
    pub method: HttpMethod,
    pub url: url::Url,
    /// Case-preserving, ordered header names and values
    pub headers: Vec<(String, String)>,
    pub body: TransportBody,
}

impl TransportRequest {
    pub fn new(method: HttpMethod, url: url::Url) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            body: TransportBody::Empty,
        }
    }

    /// Set a header, replacing any existing value with the same name in place
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(key, _)| key.eq_ignore_ascii_case(&name))
        {
            Some(slot) => *slot = (name, value),
            None => self.headers.push((name, value)),
        }
    }
}

/// HTTP response in the transport's native shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// Protocol version without the `HTTP/` prefix, e.g. `1.1`
    pub version: String,
    pub status: u16,
    pub reason: String,
    /// Header names with all of their values, in order of first appearance
    pub headers: Vec<(String, Vec<String>)>,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: u16, reason: impl Into<String>) -> Self {
        Self {
            version: "1.1".to_string(),
            status,
            reason: reason.into(),
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Append a value to a header, creating it if needed
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.headers.iter_mut().find(|(key, _)| *key == name) {
            Some((_, values)) => values.push(value),
            None => self.headers.push((name, vec![value])),
        }
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }
}

/// Asynchronous HTTP transport used to actually send requests.
///
/// Implementations own retries, timeouts and connection reuse; callers only
/// see a single request/response exchange.
#[async_trait]
pub trait AsyncTransport: Send + Sync {
    /// Send a request and receive its response
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse>;
}
