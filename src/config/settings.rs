//! Settings structures for query-dispatch configuration

use crate::client::{Credentials, Endpoint};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// Main settings structure matching settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub outgoing: OutgoingSettings,
    pub endpoints: Vec<Endpoint>,
    /// Key of the endpoint used when a dispatch names none
    pub default_endpoint: Option<String>,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from a YAML document
    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        settings.outgoing.timeout()?;
        Ok(settings)
    }

    /// Merge with environment variables (QUERY_DISPATCH_* prefix)
    pub fn merge_env(&mut self) {
        self.merge_vars(|name| std::env::var(name).ok());
    }

    fn merge_vars<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = var("QUERY_DISPATCH_DEFAULT_ENDPOINT") {
            if self.get_endpoint(&val).is_none() {
                warn!("QUERY_DISPATCH_DEFAULT_ENDPOINT names unknown endpoint {}", val);
            }
            self.default_endpoint = Some(val);
        }
        if let Some(val) = var("QUERY_DISPATCH_TIMEOUT") {
            match val.parse::<f64>() {
                Ok(timeout) if Duration::try_from_secs_f64(timeout).is_ok() => {
                    self.outgoing.request_timeout = timeout;
                }
                _ => warn!("Ignoring invalid QUERY_DISPATCH_TIMEOUT: {}", val),
            }
        }

        let username = var("QUERY_DISPATCH_USERNAME");
        let password = var("QUERY_DISPATCH_PASSWORD");
        if username.is_none() && password.is_none() {
            return;
        }

        if let Some(endpoint) = self.default_endpoint_mut() {
            let credentials = endpoint.credentials.get_or_insert_with(Credentials::default);
            if let Some(username) = username {
                credentials.username = username;
            }
            if let Some(password) = password {
                credentials.password = password;
            }
        }
    }

    /// Get endpoint config by key
    pub fn get_endpoint(&self, key: &str) -> Option<&Endpoint> {
        self.endpoints.iter().find(|e| e.key == key)
    }

    fn default_endpoint_mut(&mut self) -> Option<&mut Endpoint> {
        match self.default_endpoint.clone() {
            Some(key) => self.endpoints.iter_mut().find(|e| e.key == key),
            None => self.endpoints.first_mut(),
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Default request timeout in seconds
    pub request_timeout: f64,
    /// Pool max idle connections per host
    pub pool_maxsize: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy settings
    pub proxies: ProxySettings,
    /// Report 4xx/5xx responses as transport errors
    pub http_errors: bool,
}

impl OutgoingSettings {
    /// Request timeout as a duration; negative, NaN or overflowing values are rejected
    pub fn timeout(&self) -> Result<Duration> {
        Duration::try_from_secs_f64(self.request_timeout).map_err(|e| Error::InvalidSettings {
            message: format!("request_timeout {}: {}", self.request_timeout, e),
        })
    }
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 5.0,
            pool_maxsize: 20,
            verify_ssl: true,
            proxies: ProxySettings::default(),
            http_errors: true,
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}
