//! HTTP entry points.
//!
//! Handlers take their auth extractor first and the validated body last, so a
//! request is authenticated, then authorized, then validated, and only then
//! reaches a service.

pub mod category;
pub mod comment;
pub mod post;

use axum::{
    Json,
    extract::{FromRequestParts, Query, State},
    http::request::Parts,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{config::AppConfig, error::ApiError};

// --- Listing Parameters ---

/// ListingQuery
///
/// `Query` whose rejection (a duplicated key, say) answers in the validation
/// envelope instead of axum's plain-text 400.
#[derive(Debug, Clone)]
pub struct ListingQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ListingQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::Validation(vec![rejection.body_text()]))?;
        Ok(ListingQuery(params))
    }
}

/// ListPostsParams
///
/// Raw query string for `GET /api/posts`. Values stay strings here so a bad
/// `page` produces the API's own validation envelope instead of a framework
/// rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPostsParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub category_id: Option<String>,
}

/// Parsed form of `ListPostsParams`.
#[derive(Debug, Default, PartialEq)]
pub struct PostListing {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub category_id: Option<String>,
}

impl ListPostsParams {
    /// parse
    ///
    /// Rejects `page`/`limit` values that are not positive integers, reporting
    /// both at once. Empty values count as absent.
    pub fn parse(self) -> Result<PostListing, ApiError> {
        let mut errors = Vec::new();
        let page = positive("page", self.page, &mut errors);
        let limit = positive("limit", self.limit, &mut errors);

        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }

        Ok(PostListing {
            page,
            limit,
            category_id: non_empty(self.category_id),
        })
    }
}

/// ListCommentsParams
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCommentsParams {
    pub post_id: Option<String>,
}

impl ListCommentsParams {
    pub fn post_id(self) -> Option<String> {
        non_empty(self.post_id)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn positive(name: &str, raw: Option<String>, errors: &mut Vec<String>) -> Option<u32> {
    let raw = non_empty(raw)?;
    match raw.trim().parse::<u32>() {
        Ok(value) if value > 0 => Some(value),
        _ => {
            errors.push(format!("{name} must be a positive integer"));
            None
        }
    }
}

// --- Service Endpoints ---

#[derive(Debug, Serialize, Deserialize)]
pub struct Banner {
    pub message: String,
    pub environment: String,
}

/// GET /
pub async fn root(State(config): State<AppConfig>) -> Json<Banner> {
    Json(Banner {
        message: "Blog Management API is running".to_string(),
        environment: config.env.as_str().to_string(),
    })
}

/// GET /health
pub async fn health() -> &'static str {
    "ok"
}

// --- Fallbacks ---

/// Any path no route matches.
pub async fn not_found() -> ApiError {
    ApiError::RouteNotFound
}

/// A known path hit with a method it does not serve.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
