use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use super::{ListPostsParams, ListingQuery};
use crate::{
    auth::{AdminUser, AuthUser},
    error::{ApiError, Resource},
    models::{ApiResponse, CreatePostRequest, Pagination, UpdatePostRequest},
    services::PostService,
    validation::ValidatedJson,
};

/// list_posts
///
/// GET /api/posts?page=&limit=&categoryId=
///
/// The `pagination` object is attached only when the client asked for a
/// specific page, i.e. sent both `page` and `limit`.
pub async fn list_posts(
    State(posts): State<PostService>,
    ListingQuery(params): ListingQuery<ListPostsParams>,
) -> Result<impl IntoResponse, ApiError> {
    let listing = params.parse()?;

    let items = posts
        .list(listing.page, listing.limit, listing.category_id.as_deref())
        .await?;

    let pagination = match (listing.page, listing.limit) {
        (Some(page), Some(limit)) => Some(Pagination {
            page,
            limit,
            total: items.len(),
        }),
        _ => None,
    };

    Ok(Json(ApiResponse::data(items).with_pagination(pagination)))
}

/// GET /api/posts/{id}
pub async fn get_post(
    State(posts): State<PostService>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let post = posts
        .get(&id)
        .await?
        .ok_or(ApiError::NotFound(Resource::Post))?;
    Ok(Json(ApiResponse::data(post)))
}

/// POST /api/posts
///
/// [Authenticated] Any signed-in user may publish.
pub async fn create_post(
    user: AuthUser,
    State(posts): State<PostService>,
    ValidatedJson(payload): ValidatedJson<CreatePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let post = posts.create(payload).await?;
    info!(post_id = %post.id, actor = %user.uid, "post created");
    Ok((StatusCode::CREATED, Json(ApiResponse::data(post))))
}

/// PUT /api/posts/{id}
pub async fn update_post(
    user: AuthUser,
    State(posts): State<PostService>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdatePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let post = posts.update(&id, payload).await?;
    info!(post_id = %id, actor = %user.uid, "post updated");
    Ok(Json(ApiResponse::data(post)))
}

/// DELETE /api/posts/{id}
///
/// [Admin]
pub async fn delete_post(
    AdminUser(user): AdminUser,
    State(posts): State<PostService>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    posts.delete(&id).await?;
    info!(post_id = %id, actor = %user.uid, "post deleted");
    Ok(Json(ApiResponse::message("Post deleted successfully")))
}
