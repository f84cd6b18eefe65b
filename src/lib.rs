//! query-dispatch: asynchronous HTTP dispatch for a Solr-style search client
//!
//! The [`client`] module models queries, endpoints and generic
//! requests/responses. [`AsyncQueryDispatcher`] translates those requests
//! into transport requests, sends them through an [`AsyncTransport`] and
//! hands back a future resolving to the client's [`Response`].

pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod metrics;
pub mod network;
pub mod plugins;

pub use client::{Endpoint, Query, Request, Response, SearchClient};
pub use config::Settings;
pub use error::{Error, Result};
pub use network::AsyncTransport;
pub use plugins::{AsyncQueryDispatcher, PendingResponse};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
