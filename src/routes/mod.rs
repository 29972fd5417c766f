/// Router Module Index
///
/// One router per resource, nested under `/api/<resource>`. Access rules are
/// not applied here as layers: each handler declares them through its first
/// extractor (`AuthUser` or `AdminUser`), so a public `GET` and a protected
/// `POST` can share a path without shadowing each other. The only layer here
/// is the per-client rate limiter on the `/api` nest.
pub mod categories;
pub mod comments;
pub mod posts;

use crate::{
    AppState, handlers,
    rate_limit::{self, RateLimitState},
};
use axum::{Router, middleware, routing::get};

/// api_routes
///
/// Assembles the service endpoints (`/`, `/health`), the rate-limited `/api`
/// resource routers, and the 404/405 fallbacks that answer in the error
/// envelope.
pub fn api_routes(limiter: RateLimitState) -> Router<AppState> {
    Router::new()
        // GET /
        // Banner with the running environment.
        .route("/", get(handlers::root))
        // GET /health
        // Liveness check for load balancers; never touches the store.
        .route("/health", get(handlers::health))
        .nest("/api", resource_routes(limiter))
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::method_not_allowed)
}

/// resource_routes
///
/// Everything under `/api`, each request charged against its client's quota.
fn resource_routes(limiter: RateLimitState) -> Router<AppState> {
    Router::new()
        .nest("/categories", categories::category_routes())
        .nest("/posts", posts::post_routes())
        .nest("/comments", comments::comment_routes())
        .layer(middleware::from_fn_with_state(limiter, rate_limit::enforce))
}
