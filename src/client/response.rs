//! Generic response handed back to callers

use crate::error::Result;
use serde::de::DeserializeOwned;

/// Response in the client's own model.
///
/// `headers[0]` is the status line (`HTTP/1.1 200 OK`), followed by one
/// `"Name: value"` line per response header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    body: String,
    headers: Vec<String>,
    status_code: u16,
    status_message: String,
}

impl Response {
    /// Build a response from its body and header lines
    pub fn new(body: impl Into<String>, headers: Vec<String>) -> Self {
        let (status_code, status_message) = headers
            .first()
            .map(|line| parse_status_line(line))
            .unwrap_or((0, String::new()));

        Self {
            body: body.into(),
            headers,
            status_code,
            status_message,
        }
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn status_line(&self) -> Option<&str> {
        self.headers.first().map(|s| s.as_str())
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    /// Value of the first header line with the given name (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(name)
                .then(|| value.trim())
        })
    }

    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Split `HTTP/1.1 200 OK` into `(200, "OK")`
fn parse_status_line(line: &str) -> (u16, String) {
    let mut parts = line.splitn(3, ' ');
    let _protocol = parts.next();
    let code = parts
        .next()
        .and_then(|c| c.parse().ok())
        .unwrap_or_default();
    let message = parts.next().unwrap_or_default().to_string();
    (code, message)
}
