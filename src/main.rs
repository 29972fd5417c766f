use blog_api::{
    AppState,
    config::{AppConfig, Env, IdentityBackend, StoreBackend},
    create_router,
    identity::{IdentityState, JwtIdentityProvider, RemoteIdentityProvider},
    storage::{InMemoryDocumentStore, MongoDocumentStore, StorageState},
};
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Loads configuration, starts logging, connects the document store and the
/// identity provider, then serves the API until the process is stopped.
#[tokio::main]
async fn main() {
    // 1. Configuration (fail fast on missing production settings)
    dotenv::dotenv().ok();
    let config = AppConfig::load().expect("FATAL: invalid configuration");

    // 2. Logging: RUST_LOG wins, otherwise crate debug + request summaries.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "blog_api=debug,tower_http=info".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            // JSON lines for the log aggregator.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // 3. Document store
    let store: StorageState = match &config.store {
        StoreBackend::Mongo { uri, database } => Arc::new(
            MongoDocumentStore::connect(uri, database)
                .await
                .expect("FATAL: Failed to connect to MongoDB. Check MONGODB_URI."),
        ),
        StoreBackend::Memory => {
            tracing::warn!("using the in-memory document store; data is lost on restart");
            Arc::new(InMemoryDocumentStore::new())
        }
    };

    // 4. Identity provider
    let identity: IdentityState = match &config.identity {
        IdentityBackend::Remote { url, api_key } => {
            tracing::info!(url = %url, "verifying tokens against remote identity provider");
            Arc::new(RemoteIdentityProvider::new(url, api_key.clone()))
        }
        IdentityBackend::Jwt { secret } => Arc::new(JwtIdentityProvider::new(secret)),
    };

    // 5. State, router, server
    let addr = format!("{}:{}", config.host, config.port);
    let rate_limit = config.rate_limit.clone();
    let app = create_router(AppState::new(store, identity, config));

    let listener = TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("FATAL: could not bind {addr}: {e}"));

    tracing::info!(
        "Listening on {} ({} requests per {}s per client on /api)",
        addr,
        rate_limit.max_requests,
        rate_limit.window.as_secs()
    );

    // Peer addresses key the rate limiter when no proxy header is present.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("server error");
}
