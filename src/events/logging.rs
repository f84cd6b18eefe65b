//! Observer that logs request lifecycle events through `tracing`

use super::{EventObserver, PostExecuteRequest, PreExecuteRequest};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingObserver;

impl LoggingObserver {
    pub fn new() -> Self {
        Self
    }
}

impl EventObserver for LoggingObserver {
    fn pre_execute_request(&self, event: &PreExecuteRequest<'_>) {
        debug!(
            "Executing {} {}{} on endpoint {}",
            event.request.method,
            event.endpoint.base_uri(),
            event.request.uri(),
            event.endpoint.key
        );
    }

    fn post_execute_request(&self, event: &PostExecuteRequest<'_>) {
        let status = event.response.status_code();
        if event.response.is_success() {
            info!(
                "{} {} on endpoint {} returned {}",
                event.request.method, event.request.handler, event.endpoint.key, status
            );
        } else {
            warn!(
                "{} {} on endpoint {} returned {} {}",
                event.request.method,
                event.request.handler,
                event.endpoint.key,
                status,
                event.response.status_message()
            );
        }
    }
}
