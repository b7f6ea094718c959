use axum::{
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use std::time::{Duration, Instant};
use tracing::{info, warn};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Requests slower than this are logged at warn level.
#[derive(Clone, Copy, Debug)]
pub struct SlowRequestThreshold(pub Duration);

impl SlowRequestThreshold {
    pub fn from_millis(ms: u64) -> Self {
        Self(Duration::from_millis(ms))
    }
}

/// Propagates (or mints) `x-request-id`, logs completion with status and
/// latency, and flags slow requests.
pub async fn request_tracking_middleware<B>(
    State(threshold): State<SlowRequestThreshold>,
    mut request: Request<B>,
    next: Next<B>,
) -> Response {
    let start_time = Instant::now();
    let request_id = get_or_generate_request_id(request.headers());
    let header_value =
        HeaderValue::from_str(&request_id).unwrap_or_else(|_| HeaderValue::from_static("invalid"));

    request
        .headers_mut()
        .insert(HeaderName::from_static(REQUEST_ID_HEADER), header_value.clone());

    let method = request.method().clone();
    let uri = request.uri().clone();

    let mut response = next.run(request).await;

    let elapsed = start_time.elapsed();
    let duration_ms = elapsed.as_millis();
    response
        .headers_mut()
        .insert(HeaderName::from_static(REQUEST_ID_HEADER), header_value);

    let status = response.status();
    if status.is_server_error() {
        warn!(
            request_id = %request_id,
            method = %method,
            uri = %uri,
            status = %status,
            duration_ms = %duration_ms,
            "Request completed with server error"
        );
    } else {
        info!(
            request_id = %request_id,
            method = %method,
            uri = %uri,
            status = %status,
            duration_ms = %duration_ms,
            "Request completed"
        );
    }

    if elapsed > threshold.0 {
        warn!(
            request_id = %request_id,
            method = %method,
            uri = %uri,
            duration_ms = %duration_ms,
            threshold_ms = %threshold.0.as_millis(),
            "Slow request detected"
        );
    }

    response
}

fn get_or_generate_request_id(headers: &HeaderMap) -> String {
    extract_request_id(headers).unwrap_or_else(|| Uuid::new_v4().to_string())
}

pub fn extract_request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_incoming_request_id() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("abc-123"));
        assert_eq!(get_or_generate_request_id(&headers), "abc-123");
    }

    #[test]
    fn mints_uuid_when_missing() {
        let id = get_or_generate_request_id(&HeaderMap::new());
        assert!(Uuid::parse_str(&id).is_ok());
    }
}
