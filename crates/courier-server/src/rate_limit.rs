use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use courier_core::{Failure, Raised};
use courier_ratelimit::{RateLimitError, RequestLimiter};
use http::HeaderValue;
use http::header::RETRY_AFTER;

/// Rate limiting middleware using an Arc-wrapped limiter
///
/// `trusted_proxy_hops` is the number of reverse proxies in front of the
/// server that append to `x-forwarded-for`.
pub async fn rate_limit_middleware(
    limiter: Arc<RequestLimiter>,
    trusted_proxy_hops: usize,
    request: Request,
    next: Next,
) -> Response {
    // Check global rate limit
    if let Err(e) = limiter.check_global() {
        return rate_limited(e);
    }

    // Check per-IP rate limit
    if let Some(ip) = client_ip(&request, trusted_proxy_hops)
        && let Err(e) = limiter.check_ip(&ip)
    {
        return rate_limited(e);
    }

    next.run(request).await
}

/// Resolve the address the per-IP limit is keyed on
///
/// Without trusted proxies the TCP peer is the client and forwarding headers
/// are ignored. Behind `n` proxies the `n`th `x-forwarded-for` entry from the
/// right is the address the outermost proxy saw.
fn client_ip(request: &Request, trusted_proxy_hops: usize) -> Option<String> {
    if trusted_proxy_hops > 0
        && let Some(ip) = forwarded_ip(request, trusted_proxy_hops)
    {
        return Some(ip);
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
}

fn forwarded_ip(request: &Request, trusted_proxy_hops: usize) -> Option<String> {
    if let Some(forwarded) = request.headers().get("x-forwarded-for") {
        let entries: Vec<&str> = forwarded
            .to_str()
            .ok()?
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .collect();
        let index = entries.len().checked_sub(trusted_proxy_hops)?;
        return Some(entries[index].to_string());
    }

    // A single proxy may report the client in X-Real-IP instead
    let real_ip = request.headers().get("x-real-ip")?.to_str().ok()?.trim();
    (!real_ip.is_empty()).then(|| real_ip.to_string())
}

fn rate_limited(error: RateLimitError) -> Response {
    let retry_after = error.rate_limit().and_then(|limited| limited.retry_after);
    tracing::debug!(%error, ?retry_after, "request rejected by rate limiter");

    let mut response = Raised::new(error).into_response();
    if let Some(seconds) = retry_after {
        response.headers_mut().insert(RETRY_AFTER, HeaderValue::from(seconds));
    }

    response
}
