//! HTTP side of the admission controller.

use axum::{
    Json,
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header::RETRY_AFTER},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::metrics::{REJECTIONS, REQUEST_TOTAL};
use crate::models::MessageBody;
use crate::rate_limit::{Decision, Quota, Rejection};
use crate::state::AppState;

const RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("ratelimit-limit");
const RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("ratelimit-remaining");
const RATELIMIT_RESET: HeaderName = HeaderName::from_static("ratelimit-reset");

/// Address a request is accounted to. The peer address is authoritative
/// unless the server sits behind a trusted proxy. The proxy appends the peer
/// it saw to `X-Forwarded-For`, so only the last entry is trusted; anything
/// to its left came from the client.
pub fn client_address(headers: &HeaderMap, peer: SocketAddr, trust_proxy: bool) -> IpAddr {
    if trust_proxy {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.rsplit(',').next())
            .and_then(|last| last.trim().parse::<IpAddr>().ok());
        if let Some(ip) = forwarded {
            return ip;
        }
    }
    peer.ip()
}

// Whole seconds, rounded up, never 0
fn ceil_secs(d: Duration) -> u64 {
    let secs = d.as_secs() + u64::from(d.subsec_nanos() > 0);
    secs.max(1)
}

fn rejection_response(rejection: &Rejection) -> Response {
    let mut response = (
        StatusCode::TOO_MANY_REQUESTS,
        Json(MessageBody {
            message: rejection.to_string(),
        }),
    )
        .into_response();
    response
        .headers_mut()
        .insert(RETRY_AFTER, HeaderValue::from(ceil_secs(rejection.retry_after())));
    response
}

fn set_quota_headers(headers: &mut HeaderMap, quota: &Quota) {
    headers.insert(RATELIMIT_LIMIT, HeaderValue::from(quota.limit));
    headers.insert(RATELIMIT_REMAINING, HeaderValue::from(quota.remaining));
    headers.insert(RATELIMIT_RESET, HeaderValue::from(ceil_secs(quota.reset_after)));
}

/// Gate every request through the admission controller before routing.
pub async fn admission_middleware(
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    REQUEST_TOTAL.inc();
    let client = client_address(request.headers(), peer, state.trust_proxy).to_string();

    match state.admission.admit(&client, Instant::now()) {
        Decision::Admit(quota) => {
            let mut response = next.run(request).await;
            set_quota_headers(response.headers_mut(), &quota);
            response
        }
        Decision::Reject(rejection) => {
            debug!(client = %client, reason = rejection.reason(), "Request rejected");
            REJECTIONS.with_label_values(&[rejection.reason()]).inc();
            rejection_response(&rejection)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate_limit::{BLOCKED_MESSAGE, RateViolation};

    fn peer() -> SocketAddr {
        "192.0.2.10:40000".parse().unwrap()
    }

    fn forwarded(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_peer_address_is_default() {
        let headers = forwarded("203.0.113.7");
        assert_eq!(client_address(&headers, peer(), false), peer().ip());
    }

    #[test]
    fn test_forwarded_for_when_trusted() {
        let headers = forwarded("203.0.113.7");
        assert_eq!(
            client_address(&headers, peer(), true),
            "203.0.113.7".parse::<IpAddr>().unwrap()
        );
    }

    #[test]
    fn test_forged_leading_entry_is_ignored() {
        // client sent "198.51.100.99", the proxy appended what it saw
        let headers = forwarded("198.51.100.99, 203.0.113.7");
        assert_eq!(
            client_address(&headers, peer(), true),
            "203.0.113.7".parse::<IpAddr>().unwrap()
        );

        let headers = forwarded("198.51.100.99,garbage");
        assert_eq!(client_address(&headers, peer(), true), peer().ip());
    }

    #[test]
    fn test_invalid_forwarded_for_falls_back() {
        assert_eq!(client_address(&forwarded("garbage"), peer(), true), peer().ip());
        assert_eq!(client_address(&HeaderMap::new(), peer(), true), peer().ip());
    }

    #[test]
    fn test_ceil_secs() {
        assert_eq!(ceil_secs(Duration::ZERO), 1);
        assert_eq!(ceil_secs(Duration::from_millis(1)), 1);
        assert_eq!(ceil_secs(Duration::from_millis(1001)), 2);
        assert_eq!(ceil_secs(Duration::from_secs(900)), 900);
    }

    #[test]
    fn test_rejection_response() {
        let response = rejection_response(&Rejection::RateExceeded {
            violation: RateViolation::Burst,
            retry_after: Duration::from_secs(900),
        });
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[RETRY_AFTER], "900");
        let blocked = Rejection::AlreadyBlocked {
            retry_after: Duration::ZERO,
        };
        assert_eq!(blocked.to_string(), BLOCKED_MESSAGE);
    }

    #[test]
    fn test_quota_headers() {
        let mut headers = HeaderMap::new();
        set_quota_headers(&mut headers, &Quota {
            limit: 30,
            remaining: 12,
            reset_after: Duration::from_millis(59_500),
        });
        assert_eq!(headers["ratelimit-limit"], "30");
        assert_eq!(headers["ratelimit-remaining"], "12");
        assert_eq!(headers["ratelimit-reset"], "60");
    }
}
