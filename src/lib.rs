use axum::{
    Router,
    extract::FromRef,
    http::{HeaderName, HeaderValue, header},
};

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Ambient concerns.
pub mod config;
pub mod error;

// Request pipeline: quota, identity, access rules, payload rules.
pub mod auth;
pub mod identity;
pub mod rate_limit;
pub mod validation;

// Data path: entities, store, repositories, services.
pub mod models;
pub mod repository;
pub mod services;
pub mod storage;

// HTTP surface.
pub mod handlers;
pub mod routes;

// --- Public Re-exports ---

pub use config::AppConfig;
pub use identity::{IdentityState, JwtIdentityProvider, RemoteIdentityProvider};
pub use rate_limit::RateLimitState;
pub use services::{CategoryService, CommentService, PostService};
pub use storage::{InMemoryDocumentStore, MongoDocumentStore, StorageState};

/// AppState
///
/// The single shared container handed to the router. Built once in `main`
/// (or by a test with fakes) and cloned per request; every member is cheap
/// to clone because the store and identity provider sit behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub categories: CategoryService,
    pub posts: PostService,
    pub comments: CommentService,
    /// Verifies bearer tokens for the `AuthUser` / `AdminUser` extractors.
    pub identity: IdentityState,
    /// Per-client buckets for the `/api` routes, sized from `config.rate_limit`.
    pub rate_limit: RateLimitState,
    pub config: AppConfig,
}

impl AppState {
    /// Wires the three services onto one document store.
    pub fn new(store: StorageState, identity: IdentityState, config: AppConfig) -> Self {
        Self {
            categories: CategoryService::new(store.clone()),
            posts: PostService::new(store.clone()),
            comments: CommentService::new(store),
            identity,
            rate_limit: RateLimitState::new(&config.rate_limit),
            config,
        }
    }
}

// --- Axum FromRef Extractor Implementations ---

// Handlers pull only the component they need (`State<PostService>`), and the
// auth extractors find the identity provider the same way.

impl FromRef<AppState> for CategoryService {
    fn from_ref(app_state: &AppState) -> CategoryService {
        app_state.categories.clone()
    }
}

impl FromRef<AppState> for PostService {
    fn from_ref(app_state: &AppState) -> PostService {
        app_state.posts.clone()
    }
}

impl FromRef<AppState> for CommentService {
    fn from_ref(app_state: &AppState) -> CommentService {
        app_state.comments.clone()
    }
}

impl FromRef<AppState> for IdentityState {
    fn from_ref(app_state: &AppState) -> IdentityState {
        app_state.identity.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the routes (the `/api` nest behind the rate limiter), registers
/// the state, and wraps everything in the correlation, tracing,
/// security-header and CORS layers.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = routes::api_routes(state.rate_limit.clone()).with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                // Every request gets a UUID before the trace span opens.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(
            ServiceBuilder::new()
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("DENY"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::REFERRER_POLICY,
                    HeaderValue::from_static("no-referrer"),
                )),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Opens the per-request span with method, URI and the `x-request-id` set by
/// `SetRequestIdLayer`, so every log line of one request correlates.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
