//! Error type shared by the client model, transports and dispatcher

use std::path::PathBuf;

/// Result alias used throughout the crate
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status} {reason}")]
    Status {
        status: u16,
        reason: String,
        body: String,
    },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Malformed header line (missing ':'): {line:?}")]
    MalformedHeader { line: String },

    #[error("Cannot open upload file {}: {source}", path.display())]
    FileUpload {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown endpoint: {key}")]
    UnknownEndpoint { key: String },

    #[error("No default endpoint configured")]
    NoDefaultEndpoint,

    #[error("Invalid settings: {message}")]
    InvalidSettings { message: String },

    #[error("Invalid query: {message}")]
    InvalidQuery { message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
