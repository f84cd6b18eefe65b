//! Conversion between the client's request/response model and the
//! transport's native types

use super::transport::{TransportBody, TransportRequest, TransportResponse};
use crate::client::{Endpoint, HttpMethod, Request, Response};
use crate::error::{Error, Result};
use std::fs::File;
use url::Url;

/// Content type used for GET requests that do not declare one
pub const DEFAULT_GET_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

/// Content type used for all other requests that do not declare one
pub const DEFAULT_CONTENT_TYPE: &str = "application/xml; charset=utf-8";

/// Build the transport request for `request` sent to `endpoint`
pub fn to_transport_request(request: &Request, endpoint: &Endpoint) -> Result<TransportRequest> {
    let url = Url::parse(&format!("{}{}", endpoint.base_uri(), request.uri()))?;

    Ok(TransportRequest {
        method: request.method,
        url,
        headers: request_headers(request)?,
        body: request_body(request)?,
    })
}

/// Parse raw header lines into name/value pairs.
///
/// Each line is split on its first colon and both halves are trimmed. Lines
/// with an empty name are skipped; a repeated name, compared without regard
/// to case, overwrites the earlier value. A `Content-Type` is added when the request carries none.
pub fn request_headers(request: &Request) -> Result<Vec<(String, String)>> {
    let mut headers: Vec<(String, String)> = Vec::with_capacity(request.headers.len() + 1);

    for line in &request.headers {
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| Error::MalformedHeader { line: line.clone() })?;
        let name = name.trim();
        if name.is_empty() {
            continue;
        }

        let value = value.trim().to_string();
        match headers.iter_mut().find(|(key, _)| key.eq_ignore_ascii_case(name)) {
            Some((_, existing)) => *existing = value,
            None => headers.push((name.to_string(), value)),
        }
    }

    let has_content_type = headers
        .iter()
        .any(|(key, _)| key.eq_ignore_ascii_case("Content-Type"));
    if !has_content_type {
        let content_type = if request.method == HttpMethod::Get {
            DEFAULT_GET_CONTENT_TYPE
        } else {
            DEFAULT_CONTENT_TYPE
        };
        headers.push(("Content-Type".to_string(), content_type.to_string()));
    }

    Ok(headers)
}

/// Payload for the request: only POST carries one
pub fn request_body(request: &Request) -> Result<TransportBody> {
    if request.method != HttpMethod::Post {
        return Ok(TransportBody::Empty);
    }

    if let Some(ref path) = request.file_upload {
        let file = File::open(path).map_err(|source| Error::FileUpload {
            path: path.clone(),
            source,
        })?;
        return Ok(TransportBody::File(file));
    }

    Ok(TransportBody::Bytes(
        request.raw_data.clone().unwrap_or_default(),
    ))
}

/// Rebuild a client response from the transport response
pub fn from_transport_response(response: TransportResponse) -> Response {
    let mut lines = Vec::with_capacity(response.headers.len() + 1);
    lines.push(format!(
        "HTTP/{} {} {}",
        response.version, response.status, response.reason
    ));

    for (name, values) in &response.headers {
        lines.push(format!("{}: {}", name, values.join(", ")));
    }

    let body = String::from_utf8_lossy(&response.body).into_owned();
    Response::new(body, lines)
}
