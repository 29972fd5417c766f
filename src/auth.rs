use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};
use serde::{Deserialize, Serialize};

use crate::{
    error::ApiError,
    identity::{IdentityState, VerifiedIdentity},
};

/// Role
///
/// Application roles. `User` is the baseline every authenticated caller gets;
/// `Admin` is the elevated role required for category mutation and deletes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    /// Maps the provider's role claim. A missing claim, or any value other than
    /// `admin`, resolves to the baseline role.
    pub fn from_claim(claim: Option<&str>) -> Self {
        match claim {
            Some("admin") => Role::Admin,
            _ => Role::User,
        }
    }
}

/// AuthUser
///
/// The resolved identity of an authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub uid: String,
    pub email: Option<String>,
    pub role: Role,
}

impl From<VerifiedIdentity> for AuthUser {
    fn from(identity: VerifiedIdentity) -> Self {
        Self {
            role: Role::from_claim(identity.role.as_deref()),
            uid: identity.uid,
            email: identity.email,
        }
    }
}

/// bearer_token
///
/// Pulls the token out of `Authorization: Bearer <token>`. Returns `None` for
/// a missing header, another scheme, or an empty token.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .and_then(|rest| rest.split_whitespace().next())
}

/// authorize
///
/// Allows the request when the caller holds `required`. `Admin` satisfies every
/// requirement; `User` satisfies only `User`. There is no fallback path.
pub fn authorize(user: &AuthUser, required: Role) -> Result<(), ApiError> {
    match (required, user.role) {
        (Role::User, _) | (Role::Admin, Role::Admin) => Ok(()),
        (Role::Admin, Role::User) => Err(ApiError::Forbidden),
    }
}

/// AuthUser Extractor Implementation
///
/// Makes `AuthUser` usable as a handler argument. The token is checked against
/// the configured identity provider; nothing else in the request (and in
/// particular not the body) is read before this succeeds.
///
/// Rejection: 401 for a missing or rejected credential, 500 when the provider
/// cannot be reached.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    IdentityState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let identity = IdentityState::from_ref(state);

        let token = bearer_token(&parts.headers).ok_or(ApiError::MissingCredentials)?;

        let verified = identity.verify(token).await.map_err(|e| {
            tracing::debug!(error = %e, "bearer token verification failed");
            ApiError::from(e)
        })?;

        Ok(AuthUser::from(verified))
    }
}

/// AdminUser
///
/// An `AuthUser` that has also passed the admin role check. Using this as the
/// first handler argument runs authentication, then authorization, before the
/// request body is touched.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    IdentityState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        authorize(&user, Role::Admin)?;
        Ok(AdminUser(user))
    }
}
