//! Category endpoints.
//!
//! - `GET    /categories`
//! - `POST   /categories`
//! - `GET    /categories/{id}`
//! - `PUT    /categories/{id}`
//! - `DELETE /categories/{id}`

use axum::{extract::State, http::StatusCode, Json};

use crate::http::error::{ApiErrorBody, ApiResult};
use crate::http::extract::{ApiJson, ApiPath};
use crate::http::server::AppState;
use crate::model::{Category, CategoryPayload};

/// List every category.
#[utoipa::path(
    get,
    path = "/categories",
    tag = "categories",
    responses(
        (status = 200, description = "All categories", body = [Category]),
    )
)]
pub async fn get_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    let categories = state.store.list_categories().await?;
    tracing::info!(count = categories.len(), "Fetched all categories");
    Ok(Json(categories))
}

/// Create a category.
#[utoipa::path(
    post,
    path = "/categories",
    tag = "categories",
    request_body = CategoryPayload,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, description = "Missing or invalid name", body = ApiErrorBody),
    )
)]
pub async fn create_category(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CategoryPayload>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let new = payload.into_new()?;
    let category = state.store.create_category(new).await?;
    tracing::info!(id = category.id, name = %category.name, "Category created");
    Ok((StatusCode::CREATED, Json(category)))
}

/// Fetch one category.
#[utoipa::path(
    get,
    path = "/categories/{id}",
    tag = "categories",
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 200, description = "The category", body = Category),
        (status = 404, description = "No such category", body = ApiErrorBody),
    )
)]
pub async fn get_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Category>> {
    let category = state.store.get_category(id).await?;
    tracing::info!(id, name = %category.name, "Fetched category");
    Ok(Json(category))
}

/// Update the supplied fields of a category.
#[utoipa::path(
    put,
    path = "/categories/{id}",
    tag = "categories",
    params(("id" = i64, Path, description = "Category id")),
    request_body = CategoryPayload,
    responses(
        (status = 200, description = "The updated category", body = Category),
        (status = 400, description = "Invalid field", body = ApiErrorBody),
        (status = 404, description = "No such category", body = ApiErrorBody),
    )
)]
pub async fn update_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<CategoryPayload>,
) -> ApiResult<Json<Category>> {
    let changes = payload.into_changes()?;
    let category = state.store.update_category(id, changes).await?;
    tracing::info!(id, name = %category.name, "Updated category");
    Ok(Json(category))
}

/// Delete a category that no bike references.
#[utoipa::path(
    delete,
    path = "/categories/{id}",
    tag = "categories",
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "No such category", body = ApiErrorBody),
        (status = 409, description = "Bikes still reference the category", body = ApiErrorBody),
    )
)]
pub async fn delete_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
    state.store.delete_category(id).await?;
    tracing::info!(id, "Deleted category");
    Ok(StatusCode::NO_CONTENT)
}
