//! Public short URL construction.

use crate::AppError;
use axum::http::{HeaderMap, header};

/// Header set by reverse proxies that terminate TLS.
const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Derives the public origin (`scheme://host[:port]`) of the current request.
///
/// The scheme comes from `X-Forwarded-Proto` when it is `http` or `https`,
/// otherwise `http`. The `Host` header is used as-is, port included.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if:
/// - The `Host` header is missing or empty
/// - The header value contains invalid UTF-8
pub fn origin_from_headers(headers: &HeaderMap) -> Result<String, AppError> {
    let host = headers
        .get(header::HOST)
        .ok_or_else(|| AppError::bad_request("Missing Host header", serde_json::json!({})))?
        .to_str()
        .map_err(|_| AppError::bad_request("Invalid Host header", serde_json::json!({})))?;

    if host.is_empty() {
        return Err(AppError::bad_request(
            "Missing Host header",
            serde_json::json!({}),
        ));
    }

    let scheme = match headers.get(FORWARDED_PROTO).and_then(|v| v.to_str().ok()) {
        Some(proto) if proto.eq_ignore_ascii_case("https") => "https",
        _ => "http",
    };

    Ok(format!("{scheme}://{host}"))
}

/// Joins a base URL and a short code, tolerating a trailing slash on the base.
pub fn join_short_url(base: &str, short_code: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), short_code)
}

/// Resolves the base that short codes are appended to.
///
/// A configured `base_url` wins; otherwise the origin is taken from the
/// request headers.
pub fn short_url_base(base_url: Option<&str>, headers: &HeaderMap) -> Result<String, AppError> {
    match base_url {
        Some(base) => Ok(base.to_string()),
        None => origin_from_headers(headers),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_host(host: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static(host));
        headers
    }

    #[test]
    fn test_origin_keeps_port() {
        let headers = headers_with_host("localhost:3000");
        assert_eq!(
            origin_from_headers(&headers).unwrap(),
            "http://localhost:3000"
        );
    }

    #[test]
    fn test_origin_ipv6() {
        let headers = headers_with_host("[::1]:8080");
        assert_eq!(origin_from_headers(&headers).unwrap(), "http://[::1]:8080");
    }

    #[test]
    fn test_origin_honours_forwarded_proto() {
        let mut headers = headers_with_host("s.example.com");
        headers.insert(FORWARDED_PROTO, HeaderValue::from_static("HTTPS"));
        assert_eq!(
            origin_from_headers(&headers).unwrap(),
            "https://s.example.com"
        );

        headers.insert(FORWARDED_PROTO, HeaderValue::from_static("gopher"));
        assert_eq!(
            origin_from_headers(&headers).unwrap(),
            "http://s.example.com"
        );
    }

    #[test]
    fn test_origin_missing_host_header() {
        assert!(origin_from_headers(&HeaderMap::new()).is_err());
    }

    #[test]
    fn test_origin_invalid_utf8() {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_bytes(&[0xFF, 0xFE, 0xFD]) {
            headers.insert(header::HOST, value);
            assert!(origin_from_headers(&headers).is_err());
        }
    }

    #[test]
    fn test_join_short_url_trims_trailing_slash() {
        assert_eq!(
            join_short_url("https://s.example.com/", "abc"),
            "https://s.example.com/abc"
        );
        assert_eq!(
            join_short_url("https://s.example.com", "abc"),
            "https://s.example.com/abc"
        );
    }

    #[test]
    fn test_configured_base_url_wins_over_host() {
        let headers = headers_with_host("internal:3000");
        assert_eq!(
            short_url_base(Some("https://sho.rt"), &headers).unwrap(),
            "https://sho.rt"
        );
        assert_eq!(
            short_url_base(None, &headers).unwrap(),
            "http://internal:3000"
        );
        assert!(short_url_base(Some("https://sho.rt"), &HeaderMap::new()).is_ok());
    }
}
