use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::{identity::IdentityError, storage::StoreError};

/// Resource
///
/// The three document collections exposed by the API. Used to build the
/// resource-specific "not found" and "deleted" messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Category,
    Post,
    Comment,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resource::Category => "Category",
            Resource::Post => "Post",
            Resource::Comment => "Comment",
        };
        f.write_str(name)
    }
}

/// ApiError
///
/// The single error type surfaced by handlers and extractors. Lower layers keep
/// their own error types (`StoreError`, `IdentityError`) which are wrapped here
/// unmodified; only `into_response` turns an error into HTTP.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 400: one message per violated field rule.
    #[error("Validation error")]
    Validation(Vec<String>),

    /// 401: no `Authorization: Bearer <token>` header.
    #[error("Unauthorized: No token provided")]
    MissingCredentials,

    /// 401: the identity provider rejected the token.
    #[error("Unauthorized: Invalid or expired token")]
    InvalidCredentials,

    /// 403: authenticated, but the role is insufficient.
    #[error("Forbidden: Admin access required")]
    Forbidden,

    /// 404
    #[error("{0} not found")]
    NotFound(Resource),

    /// 404 for a path no route matches.
    #[error("Route not found")]
    RouteNotFound,

    /// 405: the path exists but not with this method.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// 429: the client used up its quota for the current window.
    #[error("Too many requests, please try again later.")]
    RateLimited,

    #[error(transparent)]
    Store(#[from] StoreError),

    /// The identity provider could not be reached (as opposed to rejecting the token).
    #[error(transparent)]
    Identity(IdentityError),
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Rejected(_) => ApiError::InvalidCredentials,
            other => ApiError::Identity(other),
        }
    }
}

/// ErrorBody
///
/// The failure envelope: `{success:false, message, errors?}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::MissingCredentials | ApiError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Store(_) | ApiError::Identity(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            ApiError::Validation(errors) => ErrorBody {
                success: false,
                message: "Validation error".to_string(),
                errors: Some(errors),
            },
            ApiError::Store(_) | ApiError::Identity(_) => {
                // The cause stays in the logs; clients only see a generic message.
                tracing::error!(error = %self, "request failed with an upstream error");
                ErrorBody {
                    success: false,
                    message: "Internal server error".to_string(),
                    errors: None,
                }
            }
            other => ErrorBody {
                success: false,
                message: other.to_string(),
                errors: None,
            },
        };

        (status, Json(body)).into_response()
    }
}
