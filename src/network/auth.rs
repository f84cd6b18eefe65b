//! HTTP Basic authentication decorator

use super::transport::{AsyncTransport, TransportRequest, TransportResponse};
use crate::client::Credentials;
use crate::error::Result;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::sync::Arc;

/// Wraps another transport and adds an `Authorization: Basic` header to
/// every request it sends.
pub struct BasicAuthTransport {
    inner: Arc<dyn AsyncTransport>,
    header_value: String,
}

impl BasicAuthTransport {
    pub fn new(inner: Arc<dyn AsyncTransport>, credentials: &Credentials) -> Self {
        Self {
            inner,
            header_value: basic_auth_value(&credentials.username, &credentials.password),
        }
    }
}

#[async_trait]
impl AsyncTransport for BasicAuthTransport {
    async fn send(&self, mut request: TransportRequest) -> Result<TransportResponse> {
        request.set_header("Authorization", self.header_value.clone());
        self.inner.send(request).await
    }
}

/// `Basic base64(username:password)`
pub fn basic_auth_value(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", username, password)))
}
