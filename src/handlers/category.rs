use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use crate::{
    auth::AdminUser,
    error::{ApiError, Resource},
    models::{ApiResponse, CreateCategoryRequest, UpdateCategoryRequest},
    services::CategoryService,
    validation::ValidatedJson,
};

/// GET /api/categories
pub async fn list_categories(
    State(categories): State<CategoryService>,
) -> Result<impl IntoResponse, ApiError> {
    let items = categories.list().await?;
    Ok(Json(ApiResponse::data(items)))
}

/// GET /api/categories/{id}
pub async fn get_category(
    State(categories): State<CategoryService>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let category = categories
        .get(&id)
        .await?
        .ok_or(ApiError::NotFound(Resource::Category))?;
    Ok(Json(ApiResponse::data(category)))
}

/// POST /api/categories
///
/// [Admin] Creates a category and answers 201 with the stored entity.
pub async fn create_category(
    AdminUser(user): AdminUser,
    State(categories): State<CategoryService>,
    ValidatedJson(payload): ValidatedJson<CreateCategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let category = categories.create(payload).await?;
    info!(category_id = %category.id, actor = %user.uid, "category created");
    Ok((StatusCode::CREATED, Json(ApiResponse::data(category))))
}

/// PUT /api/categories/{id}
pub async fn update_category(
    AdminUser(user): AdminUser,
    State(categories): State<CategoryService>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateCategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let category = categories.update(&id, payload).await?;
    info!(category_id = %id, actor = %user.uid, "category updated");
    Ok(Json(ApiResponse::data(category)))
}

/// DELETE /api/categories/{id}
pub async fn delete_category(
    AdminUser(user): AdminUser,
    State(categories): State<CategoryService>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    categories.delete(&id).await?;
    info!(category_id = %id, actor = %user.uid, "category deleted");
    Ok(Json(ApiResponse::message("Category deleted successfully")))
}
