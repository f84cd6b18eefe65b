//! Plugins extending the search client
//!
//! - async_query: dispatches queries through an async HTTP transport and
//!   reports each exchange to an optional event observer

mod async_query;

pub use async_query::{AsyncQueryDispatcher, PendingResponse};
