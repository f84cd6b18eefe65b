//! Metrics collection module
//!
//! Tracks dispatched requests, completed responses and status codes per
//! endpoint. Register [`Metrics`] as an event observer to feed it.

use crate::events::{EventObserver, PostExecuteRequest, PreExecuteRequest};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Request counters fed by lifecycle events
pub struct Metrics {
    /// Total dispatched requests
    total_requests: AtomicU64,
    /// Dispatched requests per endpoint
    endpoint_requests: RwLock<HashMap<String, u64>>,
    /// Completed responses per endpoint
    endpoint_responses: RwLock<HashMap<String, u64>>,
    /// Non-2xx responses per endpoint
    endpoint_errors: RwLock<HashMap<String, u64>>,
    /// Responses per status code
    status_codes: RwLock<HashMap<u16, u64>>,
}

impl Metrics {
    /// Create a new metrics instance
    pub fn new() -> Self {
        Self {
            total_requests: AtomicU64::new(0),
            endpoint_requests: RwLock::new(HashMap::new()),
            endpoint_responses: RwLock::new(HashMap::new()),
            endpoint_errors: RwLock::new(HashMap::new()),
            status_codes: RwLock::new(HashMap::new()),
        }
    }

    /// Record a dispatched request
    pub fn record_request(&self, endpoint: &str) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        *write(&self.endpoint_requests)
            .entry(endpoint.to_string())
            .or_insert(0) += 1;
    }

    /// Record a completed response
    pub fn record_response(&self, endpoint: &str, status: u16) {
        *write(&self.endpoint_responses)
            .entry(endpoint.to_string())
            .or_insert(0) += 1;
        *write(&self.status_codes).entry(status).or_insert(0) += 1;

        if !(200..300).contains(&status) {
            *write(&self.endpoint_errors)
                .entry(endpoint.to_string())
                .or_insert(0) += 1;
        }
    }

    /// Get total dispatched requests
    pub fn get_total_requests(&self) -> u64 {
        self.total_requests.load(Ordering::Relaxed)
    }

    /// Requests still waiting for a response (or that failed in transport)
    pub fn get_unanswered(&self, endpoint: &str) -> u64 {
        let requests = *read(&self.endpoint_requests).get(endpoint).unwrap_or(&0);
        let responses = *read(&self.endpoint_responses).get(endpoint).unwrap_or(&0);
        requests.saturating_sub(responses)
    }

    /// Number of responses with the given status code
    pub fn get_status_count(&self, status: u16) -> u64 {
        *read(&self.status_codes).get(&status).unwrap_or(&0)
    }

    /// Percentage of dispatched requests that came back 2xx
    pub fn get_reliability(&self, endpoint: &str) -> f64 {
        let requests = *read(&self.endpoint_requests).get(endpoint).unwrap_or(&0);
        let responses = *read(&self.endpoint_responses).get(endpoint).unwrap_or(&0);
        let errors = *read(&self.endpoint_errors).get(endpoint).unwrap_or(&0);

        if requests == 0 {
            100.0
        } else {
            (responses.saturating_sub(errors) as f64 / requests as f64) * 100.0
        }
    }

    /// Get all endpoint statistics
    pub fn get_endpoint_stats(&self) -> HashMap<String, EndpointStats> {
        let counts: Vec<(String, u64)> = read(&self.endpoint_requests)
            .iter()
            .map(|(endpoint, count)| (endpoint.clone(), *count))
            .collect();

        counts
            .into_iter()
            .map(|(endpoint, requests)| {
                let responses = *read(&self.endpoint_responses)
                    .get(&endpoint)
                    .unwrap_or(&0);
                let stats = EndpointStats {
                    requests,
                    responses,
                    reliability: self.get_reliability(&endpoint),
                };
                (endpoint, stats)
            })
            .collect()
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl EventObserver for Metrics {
    fn pre_execute_request(&self, event: &PreExecuteRequest<'_>) {
        self.record_request(&event.endpoint.key);
    }

    fn post_execute_request(&self, event: &PostExecuteRequest<'_>) {
        self.record_response(&event.endpoint.key, event.response.status_code());
    }
}

/// Statistics for a single endpoint
#[derive(Debug, Clone)]
pub struct EndpointStats {
    pub requests: u64,
    pub responses: u64,
    pub reliability: f64,
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}
