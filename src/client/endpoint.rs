//! Search server endpoints

use serde::{Deserialize, Serialize};

/// Username/password pair used for HTTP Basic authentication
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Both halves must be non-empty for authentication to be sent
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

/// A named search server target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoint {
    /// Key used to look the endpoint up on the client
    pub key: String,
    pub scheme: String,
    pub host: String,
    pub port: u16,
    /// Path prefix, e.g. `/solr`
    pub path: String,
    /// Core or collection name appended to the path
    pub core: Option<String>,
    pub credentials: Option<Credentials>,
}

impl Default for Endpoint {
    fn default() -> Self {
        Self {
            key: "localhost".to_string(),
            scheme: "http".to_string(),
            host: "127.0.0.1".to_string(),
            port: 8983,
            path: "/solr".to_string(),
            core: None,
            credentials: None,
        }
    }
}

impl Endpoint {
    /// Create an endpoint with default connection details
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn core(mut self, core: impl Into<String>) -> Self {
        self.core = Some(core.into());
        self
    }

    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::new(username, password));
        self
    }

    /// Credentials to send, if both username and password are set
    pub fn authentication(&self) -> Option<&Credentials> {
        self.credentials.as_ref().filter(|c| c.is_complete())
    }

    /// Base URI ending in a slash, ready for a handler to be appended
    pub fn base_uri(&self) -> String {
        let path = self.path.trim_matches('/');
        let mut uri = format!("{}://{}:{}/", self.scheme, self.host, self.port);

        if !path.is_empty() {
            uri.push_str(path);
            uri.push('/');
        }
        if let Some(core) = self.core.as_deref().map(|c| c.trim_matches('/')) {
            if !core.is_empty() {
                uri.push_str(core);
                uri.push('/');
            }
        }

        uri
    }
}
