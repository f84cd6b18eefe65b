//! reqwest-backed transport

use super::transport::{AsyncTransport, TransportBody, TransportRequest, TransportResponse};
use crate::client::HttpMethod;
use crate::config::OutgoingSettings;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, Version};
use tracing::debug;

/// Build the shared HTTP connection handle from outgoing settings
pub fn build_http_client(settings: &OutgoingSettings) -> Result<Client> {
    let mut builder = Client::builder()
        .timeout(settings.timeout()?)
        .pool_max_idle_per_host(settings.pool_maxsize)
        .gzip(true)
        .brotli(true);

    // SSL verification
    if !settings.verify_ssl {
        builder = builder.danger_accept_invalid_certs(true);
    }

    // Proxy settings
    if let Some(ref proxy_url) = settings.proxies.all {
        builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
    } else {
        if let Some(ref http) = settings.proxies.http {
            builder = builder.proxy(reqwest::Proxy::http(http)?);
        }
        if let Some(ref https) = settings.proxies.https {
            builder = builder.proxy(reqwest::Proxy::https(https)?);
        }
    }

    Ok(builder.build()?)
}

/// Async transport sending requests through a [`reqwest::Client`]
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    http_errors: bool,
}

impl ReqwestTransport {
    /// Wrap an existing client; 4xx/5xx responses are reported as errors
    pub fn new(client: Client) -> Self {
        Self {
            client,
            http_errors: true,
        }
    }

    /// Create a transport with its own client built from settings
    pub fn with_settings(settings: &OutgoingSettings) -> Result<Self> {
        Ok(Self::new(build_http_client(settings)?).http_errors(settings.http_errors))
    }

    /// Whether 4xx/5xx responses resolve as [`Error::Status`]
    pub fn http_errors(mut self, enabled: bool) -> Self {
        self.http_errors = enabled;
        self
    }

    fn method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Head => Method::HEAD,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    async fn parse_response(response: reqwest::Response) -> Result<TransportResponse> {
        let status = response.status();
        let version = version_str(response.version()).to_string();

        let mut headers: Vec<(String, Vec<String>)> = Vec::new();
        for name in response.headers().keys() {
            let values = response
                .headers()
                .get_all(name)
                .iter()
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
                .collect();
            headers.push((name.to_string(), values));
        }

        let body = response.bytes().await?.to_vec();

        Ok(TransportResponse {
            version,
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
        })
    }
}

#[async_trait]
impl AsyncTransport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
        debug!("Sending {} {}", request.method, request.url);

        let mut req_builder = self
            .client
            .request(Self::method(request.method), request.url);

        for (name, value) in &request.headers {
            req_builder = req_builder.header(name.as_str(), value.as_str());
        }

        req_builder = match request.body {
            TransportBody::Empty => req_builder,
            TransportBody::Bytes(bytes) => req_builder.body(bytes),
            TransportBody::File(file) => req_builder.body(tokio::fs::File::from_std(file)),
        };

        let response = Self::parse_response(req_builder.send().await?).await?;
        debug!("Received {} {}", response.status, response.reason);

        if self.http_errors && response.status >= 400 {
            return Err(Error::Status {
                status: response.status,
                reason: response.reason,
                body: String::from_utf8_lossy(&response.body).into_owned(),
            });
        }

        Ok(response)
    }
}

fn version_str(version: Version) -> &'static str {
    if version == Version::HTTP_09 {
        "0.9"
    } else if version == Version::HTTP_10 {
        "1.0"
    } else if version == Version::HTTP_2 {
        "2"
    } else if version == Version::HTTP_3 {
        "3"
    } else {
        "1.1"
    }
}
