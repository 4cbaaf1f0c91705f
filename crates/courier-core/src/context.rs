use http::HeaderMap;
use http::header::ACCEPT;
use serde::Serialize;

/// Authenticated delivery partner attached to the request by the auth layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Partner {
    pub id: u64,
    pub name: String,
    pub phone: String,
    pub active: bool,
}

/// Whether the caller expects a JSON response
///
/// True for requests that accept `application/json` (or a `+json` media
/// type), for XHR requests, and for anything under the API path prefix.
pub fn expects_json(headers: &HeaderMap, path: &str, api_prefix: &str) -> bool {
    let accepts_json = headers
        .get_all(ACCEPT)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.contains("/json") || v.contains("+json"));

    let is_xhr = headers
        .get("x-requested-with")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("XMLHttpRequest"));

    accepts_json || is_xhr || under_prefix(path, api_prefix)
}

fn under_prefix(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return false;
    }

    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use http::HeaderValue;

    use super::*;

    #[test]
    fn api_paths_always_expect_json() {
        let headers = HeaderMap::new();
        assert!(expects_json(&headers, "/api/orders/1", "/api"));
        assert!(expects_json(&headers, "/api", "/api/"));
        assert!(!expects_json(&headers, "/apiary", "/api"));
        assert!(!expects_json(&headers, "/dashboard", "/api"));
    }

    #[test]
    fn accept_header_selects_json() {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.api+json"));
        assert!(expects_json(&headers, "/dashboard", "/api"));

        headers.insert(ACCEPT, HeaderValue::from_static("text/html"));
        assert!(!expects_json(&headers, "/dashboard", "/api"));
    }

    #[test]
    fn xhr_requests_expect_json() {
        let mut headers = HeaderMap::new();
        headers.insert("x-requested-with", HeaderValue::from_static("XMLHttpRequest"));
        assert!(expects_json(&headers, "/dashboard", ""));
    }
}
