use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use validator::{Validate, ValidationError};

use crate::validation::{at_least_one_field, non_empty_text, required_text};

// --- Entities (what the API returns) ---

/// Category
///
/// A blog category from the `categories` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(type = "string | null")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(type = "string | null")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Post
///
/// A blog post from the `posts` collection. `author_id` and `category_id` are
/// plain references; nothing checks that they point anywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author_id: String,
    pub category_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(type = "string | null")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(type = "string | null")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Comment
///
/// A comment on a post. Comments are immutable once written, so there is no
/// `updated_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Comment {
    pub id: String,
    pub content: String,
    pub post_id: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(type = "string | null")]
    pub created_at: Option<DateTime<Utc>>,
}

// --- Request Payloads (Input Schemas) ---
//
// Bounds are declared here with `validator`; `validation::ValidatedJson` runs
// them after a JSON pre-pass has dropped unknown fields and reported type
// errors. Missing required strings deserialize as "" and fail `required_text`.

#[derive(Debug, Clone, Serialize, Deserialize, TS, Default, Validate)]
#[serde(default, rename_all = "camelCase")]
#[ts(export)]
pub struct CreateCategoryRequest {
    #[validate(custom(function = "required_text"), length(min = 3, max = 50))]
    pub name: String,
    #[validate(custom(function = "required_text"), length(min = 10, max = 200))]
    pub description: String,
}

/// UpdateCategoryRequest
///
/// Partial update: only the provided fields are written.
#[derive(Debug, Clone, Serialize, Deserialize, TS, Default, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "category_has_changes"))]
#[ts(export)]
pub struct UpdateCategoryRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "non_empty_text"), length(min = 3, max = 50))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "non_empty_text"), length(min = 10, max = 200))]
    pub description: Option<String>,
}

fn category_has_changes(req: &UpdateCategoryRequest) -> Result<(), ValidationError> {
    at_least_one_field(&[req.name.is_some(), req.description.is_some()])
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, Default, Validate)]
#[serde(default, rename_all = "camelCase")]
#[ts(export)]
pub struct CreatePostRequest {
    #[validate(custom(function = "required_text"), length(min = 5, max = 100))]
    pub title: String,
    #[validate(custom(function = "required_text"), length(min = 20, max = 5000))]
    pub content: String,
    #[validate(custom(function = "required_text"))]
    pub author_id: String,
    #[validate(custom(function = "required_text"))]
    pub category_id: String,
}

/// UpdatePostRequest
///
/// Partial update. The author of a post cannot be changed.
#[derive(Debug, Clone, Serialize, Deserialize, TS, Default, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "post_has_changes"))]
#[ts(export)]
pub struct UpdatePostRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "non_empty_text"), length(min = 5, max = 100))]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "non_empty_text"), length(min = 20, max = 5000))]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "non_empty_text"))]
    pub category_id: Option<String>,
}

fn post_has_changes(req: &UpdatePostRequest) -> Result<(), ValidationError> {
    at_least_one_field(&[
        req.title.is_some(),
        req.content.is_some(),
        req.category_id.is_some(),
    ])
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, Default, Validate)]
#[serde(default, rename_all = "camelCase")]
#[ts(export)]
pub struct CreateCommentRequest {
    #[validate(custom(function = "required_text"), length(min = 5, max = 500))]
    pub content: String,
    #[validate(custom(function = "required_text"))]
    pub post_id: String,
    #[validate(custom(function = "required_text"))]
    pub user_id: String,
}

// --- Pagination ---

/// PageRequest
///
/// A 1-based page number and a page size, both strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub const DEFAULT_PAGE: u32 = 1;
    pub const DEFAULT_LIMIT: u32 = 10;

    /// Number of records to skip before this page: `(page - 1) * limit`.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: Self::DEFAULT_PAGE,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

/// Pagination
///
/// Echo of the requested page attached to paged post listings. `total` is the
/// number of records in this page, not in the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: usize,
}

// --- Response Envelope ---

/// ApiResponse
///
/// The success envelope: `{success:true, data?, message?, pagination?}`.
/// Failures use `error::ErrorBody` instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            pagination: None,
        }
    }

    pub fn with_pagination(mut self, pagination: Option<Pagination>) -> Self {
        self.pagination = pagination;
        self
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            pagination: None,
        }
    }
}
