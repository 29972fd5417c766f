//! Per-client request quota for everything under `/api`.
//!
//! Clients are keyed by the first `X-Forwarded-For` hop when a proxy sets one,
//! otherwise by the peer address from `ConnectInfo`.

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::{net::SocketAddr, sync::Arc};

use crate::{config::RateLimitConfig, error::ApiError};

const FORWARDED_FOR: &str = "x-forwarded-for";

/// RateLimitState
///
/// One token bucket per client key, shared by every clone of the router.
#[derive(Clone)]
pub struct RateLimitState {
    limiter: Arc<DefaultKeyedRateLimiter<String>>,
}

impl RateLimitState {
    pub fn new(config: &RateLimitConfig) -> Self {
        // The whole quota is available at once and refills one request per
        // window / max_requests.
        let refill = config.window / config.max_requests.get();
        let quota = Quota::with_period(refill)
            .unwrap_or_else(|| Quota::per_second(config.max_requests))
            .allow_burst(config.max_requests);

        Self {
            limiter: Arc::new(RateLimiter::keyed(quota)),
        }
    }

    /// Takes one request from `client`'s bucket. `false` once it is empty.
    pub fn check(&self, client: &str) -> bool {
        self.limiter.check_key(&client.to_string()).is_ok()
    }
}

/// client_key
pub fn client_key(request: &Request) -> String {
    let forwarded = request
        .headers()
        .get(FORWARDED_FOR)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|hop| !hop.is_empty());

    if let Some(hop) = forwarded {
        return hop.to_string();
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// enforce
///
/// `from_fn_with_state` middleware: answers 429 in the error envelope once the
/// client's quota is spent, otherwise passes the request on.
pub async fn enforce(
    State(limiter): State<RateLimitState>,
    request: Request,
    next: Next,
) -> Response {
    let client = client_key(&request);

    if !limiter.check(&client) {
        tracing::warn!(client = %client, path = %request.uri().path(), "rate limit exceeded");
        return ApiError::RateLimited.into_response();
    }

    next.run(request).await
}
