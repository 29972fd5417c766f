use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use super::{ListCommentsParams, ListingQuery};
use crate::{
    auth::{AdminUser, AuthUser},
    error::{ApiError, Resource},
    models::{ApiResponse, CreateCommentRequest},
    services::CommentService,
    validation::ValidatedJson,
};

/// GET /api/comments?postId=
pub async fn list_comments(
    State(comments): State<CommentService>,
    ListingQuery(params): ListingQuery<ListCommentsParams>,
) -> Result<impl IntoResponse, ApiError> {
    let post_id = params.post_id();
    let items = comments.list(post_id.as_deref()).await?;
    Ok(Json(ApiResponse::data(items)))
}

/// GET /api/comments/{id}
pub async fn get_comment(
    State(comments): State<CommentService>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let comment = comments
        .get(&id)
        .await?
        .ok_or(ApiError::NotFound(Resource::Comment))?;
    Ok(Json(ApiResponse::data(comment)))
}

/// POST /api/comments
///
/// [Authenticated] `userId` is taken from the body as submitted.
pub async fn create_comment(
    user: AuthUser,
    State(comments): State<CommentService>,
    ValidatedJson(payload): ValidatedJson<CreateCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let comment = comments.create(payload).await?;
    info!(comment_id = %comment.id, post_id = %comment.post_id, actor = %user.uid, "comment created");
    Ok((StatusCode::CREATED, Json(ApiResponse::data(comment))))
}

/// DELETE /api/comments/{id}
///
/// [Admin] Moderation only; authors cannot remove their own comments.
pub async fn delete_comment(
    AdminUser(user): AdminUser,
    State(comments): State<CommentService>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    comments.delete(&id).await?;
    info!(comment_id = %id, actor = %user.uid, "comment deleted");
    Ok(Json(ApiResponse::message("Comment deleted successfully")))
}
