use std::{env, num::NonZeroU32, time::Duration};
use thiserror::Error;

/// AppConfig
///
/// Holds the application's entire configuration state. Loaded once at startup
/// and treated as immutable afterwards; handlers pull it out of `AppState`
/// through `FromRef`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Controls log format and which settings are mandatory.
    pub env: Env,
    pub host: String,
    pub port: u16,
    // Where documents live.
    pub store: StoreBackend,
    // Who verifies bearer tokens.
    pub identity: IdentityBackend,
    // Per-client request quota on `/api`.
    pub rate_limit: RateLimitConfig,
}

/// Env
///
/// Local development versus production. Production refuses to start on
/// missing infrastructure settings instead of falling back to defaults.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Env {
    pub fn as_str(&self) -> &'static str {
        match self {
            Env::Local => "local",
            Env::Production => "production",
        }
    }
}

/// StoreBackend
#[derive(Clone, PartialEq, Debug)]
pub enum StoreBackend {
    Mongo { uri: String, database: String },
    Memory,
}

/// IdentityBackend
///
/// `Jwt` verifies tokens locally with the provider's shared secret; `Remote`
/// asks the provider's user endpoint.
#[derive(Clone, PartialEq, Debug)]
pub enum IdentityBackend {
    Jwt { secret: String },
    Remote { url: String, api_key: Option<String> },
}

/// RateLimitConfig
///
/// Each client may send `max_requests` within `window`. The full quota is
/// available as a burst and refills evenly across the window.
#[derive(Clone, PartialEq, Debug)]
pub struct RateLimitConfig {
    pub max_requests: NonZeroU32,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    /// 100 requests per 15 minutes.
    fn default() -> Self {
        Self {
            max_requests: NonZeroU32::new(100).unwrap_or(NonZeroU32::MIN),
            window: Duration::from_secs(15 * 60),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

const LOCAL_JWT_SECRET: &str = "local-development-secret-change-me";
const DEFAULT_DATABASE: &str = "blog";

impl Default for AppConfig {
    /// Safe local configuration with the in-memory store, for tests and quick starts.
    fn default() -> Self {
        Self {
            env: Env::Local,
            host: "127.0.0.1".to_string(),
            port: 3000,
            store: StoreBackend::Memory,
            identity: IdentityBackend::Jwt {
                secret: LOCAL_JWT_SECRET.to_string(),
            },
            rate_limit: RateLimitConfig::default(),
        }
    }
}

fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables (call `dotenv` first
    /// if a `.env` file should be honoured).
    ///
    /// # Errors
    /// In production, a missing `MONGODB_URI`, or a missing identity setting
    /// (`AUTH_URL` or `AUTH_JWT_SECRET`), is a `ConfigError::Missing`. An
    /// unparsable `PORT`, `APP_ENV` or `DOCUMENT_STORE` is `ConfigError::Invalid`,
    /// as is a `RATE_LIMIT_MAX` or `RATE_LIMIT_WINDOW_SECS` that is not a
    /// positive integer.
    pub fn load() -> Result<Self, ConfigError> {
        let env = match var("APP_ENV").as_deref() {
            None | Some("local") | Some("development") => Env::Local,
            Some("production") => Env::Production,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "APP_ENV",
                    value: other.to_string(),
                });
            }
        };

        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match var("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: raw.clone(),
            })?,
            None => 3000,
        };

        let store = Self::load_store(&env)?;
        let identity = Self::load_identity(&env)?;
        let rate_limit = Self::load_rate_limit()?;

        Ok(Self {
            env,
            host,
            port,
            store,
            identity,
            rate_limit,
        })
    }

    fn load_store(env: &Env) -> Result<StoreBackend, ConfigError> {
        let uri = var("MONGODB_URI");
        let database = var("MONGODB_DATABASE").unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        match var("DOCUMENT_STORE").as_deref() {
            Some("memory") => Ok(StoreBackend::Memory),
            Some("mongo") => Self::mongo(uri, database),
            Some(other) => Err(ConfigError::Invalid {
                name: "DOCUMENT_STORE",
                value: other.to_string(),
            }),
            None if *env == Env::Production || uri.is_some() => Self::mongo(uri, database),
            None => Ok(StoreBackend::Memory),
        }
    }

    fn mongo(uri: Option<String>, database: String) -> Result<StoreBackend, ConfigError> {
        let uri = uri.ok_or(ConfigError::Missing("MONGODB_URI"))?;
        Ok(StoreBackend::Mongo { uri, database })
    }

    fn load_identity(env: &Env) -> Result<IdentityBackend, ConfigError> {
        if let Some(url) = var("AUTH_URL") {
            return Ok(IdentityBackend::Remote {
                url,
                api_key: var("AUTH_API_KEY"),
            });
        }

        let secret = match (env, var("AUTH_JWT_SECRET")) {
            (_, Some(secret)) => secret,
            (Env::Production, None) => return Err(ConfigError::Missing("AUTH_JWT_SECRET")),
            (Env::Local, None) => LOCAL_JWT_SECRET.to_string(),
        };

        Ok(IdentityBackend::Jwt { secret })
    }

    fn load_rate_limit() -> Result<RateLimitConfig, ConfigError> {
        let defaults = RateLimitConfig::default();

        let max_requests = match var("RATE_LIMIT_MAX") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: "RATE_LIMIT_MAX",
                value: raw.clone(),
            })?,
            None => defaults.max_requests,
        };

        let window = match var("RATE_LIMIT_WINDOW_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "RATE_LIMIT_WINDOW_SECS",
                        value: raw,
                    });
                }
            },
            None => defaults.window,
        };

        Ok(RateLimitConfig {
            max_requests,
            window,
        })
    }
}
