use axum::{
    extract::State,
    http::{HeaderValue, Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Adds HSTS, nosniff, frame-deny and no-referrer headers to every response.
pub async fn security_headers<B>(request: Request<B>, next: Next<B>) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(
        header::STRICT_TRANSPORT_SECURITY,
        HeaderValue::from_static("max-age=15552000; includeSubDomains"),
    );
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("no-referrer"),
    );
    response
}

#[derive(Clone, Copy, Debug)]
pub struct HttpsPolicy {
    pub enforce: bool,
}

/// Location to redirect a plain-HTTP request to, or `None` when it may pass.
pub fn https_redirect_target<B>(request: &Request<B>) -> Option<String> {
    let proto = request
        .headers()
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(',').next().unwrap_or(v).trim().to_ascii_lowercase());

    if proto.as_deref() == Some("https") || request.uri().scheme_str() == Some("https") {
        return None;
    }

    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())?;
    let path = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    Some(format!("https://{}{}", host, path))
}

/// With enforcement on, answers plain-HTTP requests with a 301 to the HTTPS URL.
pub async fn enforce_https<B>(
    State(policy): State<HttpsPolicy>,
    request: Request<B>,
    next: Next<B>,
) -> Response {
    if policy.enforce {
        if let Some(target) = https_redirect_target(&request) {
            if let Ok(location) = HeaderValue::from_str(&target) {
                return (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)])
                    .into_response();
            }
        }
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(proto: Option<&str>) -> Request<()> {
        let mut builder = Request::builder()
            .uri("/api/projects?x=1")
            .header(header::HOST, "hub.example.com");
        if let Some(p) = proto {
            builder = builder.header("x-forwarded-proto", p);
        }
        builder.body(()).unwrap()
    }

    #[test]
    fn forwarded_https_passes() {
        assert_eq!(https_redirect_target(&request(Some("https"))), None);
    }

    #[test]
    fn plain_http_redirects_with_path() {
        assert_eq!(
            https_redirect_target(&request(Some("http"))).as_deref(),
            Some("https://hub.example.com/api/projects?x=1")
        );
        assert!(https_redirect_target(&request(None)).is_some());
    }
}
