use axum::{
    extract::Request,
    http::{
        HeaderValue, StatusCode,
        header::{self, HeaderName},
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

/// 100 years; the gateway is HTTPS-only behind its proxy.
pub const HSTS_VALUE: &str = "max-age=3153600000";

/// Adds HSTS and the usual hardening headers to every response.
pub async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    headers.insert(
        header::STRICT_TRANSPORT_SECURITY,
        HeaderValue::from_static(HSTS_VALUE),
    );
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        HeaderName::from_static("permissions-policy"),
        HeaderValue::from_static("geolocation=(), microphone=(), camera=()"),
    );

    response
}

/// Canonical form of `path`: no trailing slash, no repeated slashes.
///
/// Returns `None` when `path` is already canonical.
pub fn canonical_path(path: &str) -> Option<String> {
    if path == "/" || !path.ends_with('/') {
        return None;
    }

    let mut canonical = String::with_capacity(path.len());
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        canonical.push('/');
        canonical.push_str(segment);
    }
    if canonical.is_empty() {
        canonical.push('/');
    }
    Some(canonical)
}

/// 301 from `/a/b/?q` to `/a/b?q`.
///
/// Install on the outermost router: `Router::layer` also wraps the fallback,
/// so non-canonical paths that match no route are redirected too.
pub async fn trailing_slash_redirect(request: Request, next: Next) -> Response {
    let uri = request.uri();
    let Some(path) = canonical_path(uri.path()) else {
        return next.run(request).await;
    };

    let location = match uri.query() {
        Some(query) => format!("{path}?{query}"),
        None => path,
    };

    match HeaderValue::from_str(&location) {
        Ok(location) => (
            StatusCode::MOVED_PERMANENTLY,
            [(header::LOCATION, location)],
        )
            .into_response(),
        Err(_) => next.run(request).await,
    }
}
