// src/logging_middleware.rs
//! Middleware for logging request and response bodies in debug mode

use axum::{
    body::Body,
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use axum::body::to_bytes;
use std::time::Instant;
use tracing::debug;

/// Middleware to log request bodies and response status in debug mode
///
/// Multipart bodies (avatar and screenshot uploads) are passed through
/// unbuffered; logging megabytes of image bytes helps nobody.
pub async fn log_request_response(request: Request, next: Next) -> Result<Response, StatusCode> {
    let started = Instant::now();

    let is_multipart = request
        .headers()
        .get(axum::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("multipart/form-data"))
        .unwrap_or(false);

    if is_multipart {
        let method = request.method().clone();
        let uri = request.uri().clone();
        let response = next.run(request).await;
        debug!(
            method = %method,
            uri = %uri,
            status = %response.status(),
            elapsed_ms = %started.elapsed().as_millis(),
            "📤 Response (multipart request body skipped)"
        );
        return Ok(response);
    }

    let (parts, body) = request.into_parts();

    let bytes = to_bytes(body, usize::MAX)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if !bytes.is_empty() {
        if let Ok(body_str) = std::str::from_utf8(&bytes) {
            // Try to parse as JSON for pretty printing
            if let Ok(json) = serde_json::from_str::<serde_json::Value>(body_str) {
                debug!(
                    method = %parts.method,
                    uri = %parts.uri,
                    request_body = %serde_json::to_string_pretty(&json).unwrap_or_else(|_| body_str.to_string()),
                    "📥 Request"
                );
            } else {
                debug!(
                    method = %parts.method,
                    uri = %parts.uri,
                    request_body = %body_str,
                    "📥 Request"
                );
            }
        }
    }

    let method = parts.method.clone();
    let uri = parts.uri.clone();
    let request = Request::from_parts(parts, Body::from(bytes));

    let response = next.run(request).await;

    debug!(
        method = %method,
        uri = %uri,
        status = %response.status(),
        elapsed_ms = %started.elapsed().as_millis(),
        "📤 Response"
    );

    Ok(response)
}
