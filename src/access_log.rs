use axum::{
    body::{Body, HttpBody},
    extract::Request,
    http::{header, Method, StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::time::{Duration, Instant};

use crate::error::ApiError;

/// Upper bound on a POST body buffered for logging; matches axum's default body limit
const MAX_LOGGED_BODY: usize = 2 * 1024 * 1024;

/// Access-log middleware
///
/// Emits one line per request on the `access_log` target:
/// `METHOD URL STATUS CONTENT-LENGTH - RESPONSE_TIME ms`, followed by the
/// compact JSON request body for POST requests.
pub async fn access_log(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();

    let (response, logged_body) = if method == Method::POST {
        match buffer_body(request).await {
            Ok((request, logged_body)) => (next.run(request).await, Some(logged_body)),
            Err(err) => (err.into_response(), None),
        }
    } else {
        (next.run(request).await, None)
    };

    let line = format_access_line(
        &method,
        &uri,
        response.status(),
        content_length(&response).as_deref(),
        start.elapsed(),
        logged_body.as_deref(),
    );
    tracing::info!(target: "access_log", "{}", line);

    response
}

/// Read the body so it can be logged, then hand an identical one downstream
async fn buffer_body(request: Request) -> Result<(Request, String), ApiError> {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, MAX_LOGGED_BODY)
        .await
        .map_err(|err| ApiError::MalformedBody(format!("failed to read body: {}", err)))?;

    let logged = compact_json(&bytes);
    Ok((Request::from_parts(parts, Body::from(bytes)), logged))
}

/// Compact JSON of a request body, `{}` when it is empty or not JSON
pub fn compact_json(bytes: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(bytes)
        .map(|value| value.to_string())
        .unwrap_or_else(|_| "{}".to_string())
}

fn content_length(response: &Response) -> Option<String> {
    if let Some(value) = response.headers().get(header::CONTENT_LENGTH) {
        return value.to_str().ok().map(str::to_string);
    }
    response
        .body()
        .size_hint()
        .exact()
        .map(|len| len.to_string())
}

pub fn format_access_line(
    method: &Method,
    uri: &Uri,
    status: StatusCode,
    content_length: Option<&str>,
    elapsed: Duration,
    body: Option<&str>,
) -> String {
    let mut line = format!(
        "{} {} {} {} - {:.3} ms",
        method,
        uri,
        status.as_u16(),
        content_length.unwrap_or("-"),
        elapsed.as_secs_f64() * 1000.0
    );
    if let Some(body) = body {
        line.push(' ');
        line.push_str(body);
    }
    line
}
