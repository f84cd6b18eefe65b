//! Request lifecycle events
//!
//! Observers can hook into a dispatch at two points:
//! - pre_execute_request: after the request is built, before anything is sent
//! - post_execute_request: after the response has been converted, before the
//!   caller sees it

mod logging;

pub use logging::LoggingObserver;

use crate::client::{Endpoint, Request, Response};
use std::sync::Arc;

/// Fired before a request is sent
#[derive(Debug, Clone, Copy)]
pub struct PreExecuteRequest<'a> {
    pub request: &'a Request,
    pub endpoint: &'a Endpoint,
}

/// Fired once a response has been received and converted
#[derive(Debug, Clone, Copy)]
pub struct PostExecuteRequest<'a> {
    pub request: &'a Request,
    pub endpoint: &'a Endpoint,
    pub response: &'a Response,
}

/// Receives lifecycle notifications; both hooks default to doing nothing
pub trait EventObserver: Send + Sync {
    /// Called before the request is handed to the transport
    fn pre_execute_request(&self, _event: &PreExecuteRequest<'_>) {}

    /// Called after a successful exchange
    fn post_execute_request(&self, _event: &PostExecuteRequest<'_>) {}
}

/// Fans events out to every registered observer in registration order
#[derive(Default, Clone)]
pub struct EventDispatcher {
    observers: Vec<Arc<dyn EventObserver>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer
    pub fn register(&mut self, observer: Arc<dyn EventObserver>) {
        self.observers.push(observer);
    }

    pub fn with_observer(mut self, observer: Arc<dyn EventObserver>) -> Self {
        self.register(observer);
        self
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl EventObserver for EventDispatcher {
    fn pre_execute_request(&self, event: &PreExecuteRequest<'_>) {
        for observer in &self.observers {
            observer.pre_execute_request(event);
        }
    }

    fn post_execute_request(&self, event: &PostExecuteRequest<'_>) {
        for observer in &self.observers {
            observer.post_execute_request(event);
        }
    }
}
