//! HTTP networking module
//!
//! Provides the async transport abstraction, the reqwest implementation,
//! Basic authentication and the translation between the client model and
//! transport requests/responses.

mod auth;
mod client;
pub mod translate;
mod transport;

pub use auth::{basic_auth_value, BasicAuthTransport};
pub use client::{build_http_client, ReqwestTransport};
pub use transport::{AsyncTransport, TransportBody, TransportRequest, TransportResponse};
