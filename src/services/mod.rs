//! Business layer: turns untyped documents into entities and owns the
//! per-operation rules (timestamps, defaults, not-found handling).

pub mod category;
pub mod comment;
pub mod post;

pub use category::CategoryService;
pub use comment::CommentService;
pub use post::PostService;

use chrono::{DateTime, SubsecRound, Utc};

use crate::{
    error::{ApiError, Resource},
    storage::{Document, StoreError},
};

/// Current time truncated to milliseconds, the finest precision every store
/// backend keeps. A value stamped here reads back unchanged.
pub(crate) fn timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Reads a string field, defaulting to empty when it is missing or not a string.
pub(crate) fn text(doc: &Document, field: &str) -> String {
    doc.get_str(field).unwrap_or_default().to_string()
}

/// Store "not found" on update means the caller addressed a missing entity.
pub(crate) fn not_found_as(resource: Resource) -> impl FnOnce(StoreError) -> ApiError {
    move |err| match err {
        StoreError::NotFound { .. } => ApiError::NotFound(resource),
        other => ApiError::Store(other),
    }
}
