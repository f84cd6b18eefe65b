//! Search client model
//!
//! The client owns the configured endpoints and the HTTP connection handle,
//! and turns queries into generic [`Request`]s. Sending is left to the
//! dispatcher in [`crate::plugins`].

pub mod endpoint;
pub mod query;
pub mod request;
pub mod response;

pub use endpoint::{Credentials, Endpoint};
pub use query::{Query, QueryType};
pub use request::{HttpMethod, Request};
pub use response::Response;

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::network::build_http_client;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Endpoint selector: a registered key or a standalone endpoint
#[derive(Debug, Clone, Copy)]
pub enum EndpointRef<'a> {
    Key(&'a str),
    Endpoint(&'a Endpoint),
}

impl<'a> From<&'a str> for EndpointRef<'a> {
    fn from(key: &'a str) -> Self {
        Self::Key(key)
    }
}

impl<'a> From<&'a Endpoint> for EndpointRef<'a> {
    fn from(endpoint: &'a Endpoint) -> Self {
        Self::Endpoint(endpoint)
    }
}

/// Search client holding endpoints and the configured HTTP connection
#[derive(Debug, Clone)]
pub struct SearchClient {
    http: reqwest::Client,
    http_errors: bool,
    endpoints: HashMap<String, Endpoint>,
    default_endpoint: Option<String>,
}

impl SearchClient {
    /// Create a client around an existing HTTP connection handle
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            http_errors: true,
            endpoints: HashMap::new(),
            default_endpoint: None,
        }
    }

    /// Create a client with endpoints and connection settings from configuration
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let http = build_http_client(&settings.outgoing)?;
        let mut client = Self::new(http);
        client.http_errors = settings.outgoing.http_errors;

        for endpoint in &settings.endpoints {
            client.add_endpoint(endpoint.clone());
        }
        if let Some(ref key) = settings.default_endpoint {
            client.set_default_endpoint(key)?;
        }

        Ok(client)
    }

    /// Register an endpoint; the first one registered becomes the default.
    ///
    /// An endpoint with an already registered key replaces the earlier one.
    pub fn add_endpoint(&mut self, endpoint: Endpoint) -> &mut Self {
        if self.default_endpoint.is_none() {
            self.default_endpoint = Some(endpoint.key.clone());
        }
        debug!("Registered endpoint {} at {}", endpoint.key, endpoint.base_uri());
        if let Some(previous) = self.endpoints.insert(endpoint.key.clone(), endpoint) {
            warn!(
                "Endpoint {} at {} replaced by a later endpoint with the same key",
                previous.key,
                previous.base_uri()
            );
        }
        self
    }

    /// Builder-style variant of [`SearchClient::add_endpoint`]
    pub fn with_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.add_endpoint(endpoint);
        self
    }

    pub fn set_default_endpoint(&mut self, key: &str) -> Result<()> {
        if !self.endpoints.contains_key(key) {
            return Err(Error::UnknownEndpoint {
                key: key.to_string(),
            });
        }
        self.default_endpoint = Some(key.to_string());
        Ok(())
    }

    /// Resolve an endpoint, falling back to the default when none is given
    pub fn endpoint(&self, endpoint: Option<EndpointRef<'_>>) -> Result<Endpoint> {
        match endpoint {
            Some(EndpointRef::Endpoint(endpoint)) => Ok(endpoint.clone()),
            Some(EndpointRef::Key(key)) => {
                self.endpoints
                    .get(key)
                    .cloned()
                    .ok_or_else(|| Error::UnknownEndpoint {
                        key: key.to_string(),
                    })
            }
            None => {
                let key = self
                    .default_endpoint
                    .as_deref()
                    .ok_or(Error::NoDefaultEndpoint)?;
                self.endpoint(Some(EndpointRef::Key(key)))
            }
        }
    }

    /// Get all endpoint keys
    pub fn endpoint_keys(&self) -> Vec<&str> {
        self.endpoints.keys().map(|s| s.as_str()).collect()
    }

    /// Build the generic request for a query
    pub fn create_request(&self, query: &dyn Query) -> Result<Request> {
        let request = query.build_request()?;
        debug!(
            "Created {} request {} {}",
            query.query_type(),
            request.method,
            request.uri()
        );
        Ok(request)
    }

    /// Configured HTTP connection handle
    pub fn http_client(&self) -> &reqwest::Client {
        &self.http
    }

    /// Whether 4xx/5xx responses are reported as errors by derived transports
    pub fn http_errors(&self) -> bool {
        self.http_errors
    }
}

impl Default for SearchClient {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}
