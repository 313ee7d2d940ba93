//! Bike endpoints.
//!
//! - `GET    /bikes`
//! - `POST   /bikes`
//! - `GET    /bikes/{id}`
//! - `PUT    /bikes/{id}`
//! - `DELETE /bikes/{id}`

use axum::{extract::State, http::StatusCode, Json};

use crate::http::error::{ApiErrorBody, ApiResult};
use crate::http::extract::{ApiJson, ApiPath};
use crate::http::server::AppState;
use crate::model::{BikePayload, BikeView};

/// List every bike.
#[utoipa::path(
    get,
    path = "/bikes",
    tag = "bikes",
    responses(
        (status = 200, description = "All bikes", body = [BikeView]),
    )
)]
pub async fn get_bikes(State(state): State<AppState>) -> ApiResult<Json<Vec<BikeView>>> {
    let bikes: Vec<BikeView> = state
        .store
        .list_bikes()
        .await?
        .into_iter()
        .map(BikeView::from)
        .collect();
    tracing::info!(count = bikes.len(), "Fetched all bikes");
    Ok(Json(bikes))
}

/// Create a bike in an existing category.
#[utoipa::path(
    post,
    path = "/bikes",
    tag = "bikes",
    request_body = BikePayload,
    responses(
        (status = 201, description = "Bike created", body = BikeView),
        (status = 400, description = "Missing or invalid field", body = ApiErrorBody),
        (status = 404, description = "No such category", body = ApiErrorBody),
    )
)]
pub async fn create_bike(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<BikePayload>,
) -> ApiResult<(StatusCode, Json<BikeView>)> {
    let new = payload.into_new()?;
    let bike = state.store.create_bike(new).await?;
    tracing::info!(id = bike.id, name = %bike.name, category = %bike.category_name, "Bike created");
    Ok((StatusCode::CREATED, Json(bike.into())))
}

/// Fetch one bike.
#[utoipa::path(
    get,
    path = "/bikes/{id}",
    tag = "bikes",
    params(("id" = i64, Path, description = "Bike id")),
    responses(
        (status = 200, description = "The bike", body = BikeView),
        (status = 404, description = "No such bike", body = ApiErrorBody),
    )
)]
pub async fn get_bike(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<BikeView>> {
    let bike = state.store.get_bike(id).await?;
    tracing::info!(id, name = %bike.name, "Fetched bike");
    Ok(Json(bike.into()))
}

/// Update the supplied fields of a bike.
#[utoipa::path(
    put,
    path = "/bikes/{id}",
    tag = "bikes",
    params(("id" = i64, Path, description = "Bike id")),
    request_body = BikePayload,
    responses(
        (status = 200, description = "The updated bike", body = BikeView),
        (status = 400, description = "Invalid field", body = ApiErrorBody),
        (status = 404, description = "No such bike, or no such category", body = ApiErrorBody),
    )
)]
pub async fn update_bike(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<BikePayload>,
) -> ApiResult<Json<BikeView>> {
    let changes = payload.into_changes()?;
    let bike = state.store.update_bike(id, changes).await?;
    tracing::info!(id, name = %bike.name, "Updated bike");
    Ok(Json(bike.into()))
}

/// Delete a bike.
#[utoipa::path(
    delete,
    path = "/bikes/{id}",
    tag = "bikes",
    params(("id" = i64, Path, description = "Bike id")),
    responses(
        (status = 204, description = "Bike deleted"),
        (status = 404, description = "No such bike", body = ApiErrorBody),
    )
)]
pub async fn delete_bike(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
    state.store.delete_bike(id).await?;
    tracing::info!(id, "Deleted bike");
    Ok(StatusCode::NO_CONTENT)
}
