use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_LENGTH, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use std::time::Instant;

use crate::middleware::request_id::RequestId;

const MAX_BUFFERED_BODY_BYTES: usize = 64 * 1024;
const MAX_LOGGED_BODY_BYTES: usize = 2048;

/// Logs every 4xx (WARN) and 5xx (ERROR) response with a preview of its body.
///
/// The body is buffered and handed back unchanged to the caller.
pub async fn log_error_responses(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let request_id = req
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default();
    let started = Instant::now();

    let response = next.run(req).await;
    let status = response.status();
    if !is_logged_status(status) {
        return response;
    }

    let latency_ms = started.elapsed().as_millis() as u64;
    let (mut parts, body) = response.into_parts();
    let (body, preview) = match to_bytes(body, MAX_BUFFERED_BODY_BYTES).await {
        Ok(bytes) => {
            let preview = body_preview(&bytes);
            (Body::from(bytes), preview)
        }
        Err(err) => {
            parts.headers.remove(CONTENT_LENGTH);
            (Body::empty(), format!("<unreadable body: {}>", err))
        }
    };

    if status.is_server_error() {
        tracing::error!(
            status = status.as_u16(),
            %method,
            %uri,
            request_id = %request_id,
            latency_ms,
            body = %preview,
            "Request failed"
        );
    } else {
        tracing::warn!(
            status = status.as_u16(),
            %method,
            %uri,
            request_id = %request_id,
            latency_ms,
            body = %preview,
            "Request rejected"
        );
    }

    Response::from_parts(parts, body)
}

fn body_preview(bytes: &[u8]) -> String {
    if bytes.len() <= MAX_LOGGED_BODY_BYTES {
        return String::from_utf8_lossy(bytes).into_owned();
    }
    format!(
        "{}... ({} bytes)",
        String::from_utf8_lossy(&bytes[..MAX_LOGGED_BODY_BYTES]),
        bytes.len()
    )
}

/// Whether a status is one the error logger reports.
pub fn is_logged_status(status: StatusCode) -> bool {
    status.is_client_error() || status.is_server_error()
}
