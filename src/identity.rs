use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// VerifiedIdentity
///
/// What the identity provider vouches for once a token checks out. `role` is
/// the raw claim; mapping it onto the application's roles happens in `auth`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub uid: String,
    pub email: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Error)]
pub enum IdentityError {
    /// The provider looked at the token and refused it (bad signature, expired, revoked...).
    #[error("credential rejected: {0}")]
    Rejected(String),

    /// The provider could not give an answer at all.
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

/// IdentityProvider
///
/// The external service that issues and verifies bearer credentials.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, IdentityError>;
}

/// IdentityState
///
/// The concrete type used to share the identity provider across the application state.
pub type IdentityState = Arc<dyn IdentityProvider>;

// --- Signed Token Verification ---

/// AppMetadata
///
/// Provider-managed metadata block. Administrators grant roles here, so it
/// takes precedence over a top-level `role` claim.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Claims
///
/// Payload expected inside a provider-issued JWT.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the provider's user id.
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_metadata: Option<AppMetadata>,
    pub exp: usize,
    #[serde(default)]
    pub iat: usize,
}

impl Claims {
    fn resolved_role(&self) -> Option<String> {
        self.app_metadata
            .as_ref()
            .and_then(|meta| meta.role.clone())
            .or_else(|| self.role.clone())
    }
}

/// JwtIdentityProvider
///
/// Verifies HS256 tokens signed with the secret shared with the identity
/// provider. Expiry is always enforced.
#[derive(Clone)]
pub struct JwtIdentityProvider {
    key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityProvider {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // Provider tokens carry an audience we do not pin.
        validation.validate_aud = false;

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, IdentityError> {
        let data = decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|e| IdentityError::Rejected(e.to_string()))?;

        let claims = data.claims;
        Ok(VerifiedIdentity {
            role: claims.resolved_role(),
            uid: claims.sub,
            email: claims.email,
        })
    }
}

// --- Remote Verification ---

/// RemoteUser
///
/// Minimal view of the provider's `/auth/v1/user` response.
#[derive(Debug, Deserialize)]
struct RemoteUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    app_metadata: AppMetadata,
}

/// RemoteIdentityProvider
///
/// Asks the provider itself whether a token is valid by calling its user
/// endpoint with the token. No local key material is needed.
#[derive(Clone)]
pub struct RemoteIdentityProvider {
    client: reqwest::Client,
    user_endpoint: String,
    api_key: Option<String>,
}

impl RemoteIdentityProvider {
    pub fn new(base_url: &str, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            user_endpoint: format!("{}/auth/v1/user", base_url.trim_end_matches('/')),
            api_key,
        }
    }
}

#[async_trait]
impl IdentityProvider for RemoteIdentityProvider {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, IdentityError> {
        let mut request = self.client.get(&self.user_endpoint).bearer_auth(token);
        if let Some(key) = &self.api_key {
            request = request.header("apikey", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| IdentityError::Unavailable(e.to_string()))?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(IdentityError::Rejected(format!(
                    "provider answered {}",
                    response.status()
                )));
            }
            status => {
                return Err(IdentityError::Unavailable(format!(
                    "provider answered {status}"
                )));
            }
        }

        let user = response
            .json::<RemoteUser>()
            .await
            .map_err(|e| IdentityError::Unavailable(e.to_string()))?;

        Ok(VerifiedIdentity {
            uid: user.id,
            email: user.email,
            role: user.app_metadata.role,
        })
    }
}
