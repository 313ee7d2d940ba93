//! API documentation routes.
//!
//! - `GET /` redirects to the Swagger UI
//! - `GET {swagger_path}` serves the Swagger UI
//! - `GET /static/openapi.json` serves the OpenAPI document
//! - `GET /static/*` serves files from the configured static directory
//!
//! A file named `openapi.json` in the static directory shadows the generated
//! document.

use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::DocsConfig;
use crate::http::error::ApiErrorBody;
use crate::http::handlers::{bikes, categories};
use crate::model::{BikePayload, BikeView, Category, CategoryPayload, FieldError};

pub const OPENAPI_URL: &str = "/static/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bikeshop API",
        description = "Catalog of bike categories and the bikes in them."
    ),
    paths(
        categories::get_categories,
        categories::create_category,
        categories::get_category,
        categories::update_category,
        categories::delete_category,
        bikes::get_bikes,
        bikes::create_bike,
        bikes::get_bike,
        bikes::update_bike,
        bikes::delete_bike,
    ),
    components(schemas(
        Category,
        CategoryPayload,
        BikeView,
        BikePayload,
        ApiErrorBody,
        FieldError,
    )),
    tags(
        (name = "categories", description = "Bike categories"),
        (name = "bikes", description = "Bikes, each in one category"),
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Root redirect, Swagger UI and static files.
pub fn routes(config: &DocsConfig) -> Router {
    let swagger_path = config.swagger_path.clone();
    let static_files = ServeDir::new(&config.static_dir)
        .fallback(Router::new().route("/openapi.json", get(openapi_json)));

    Router::new()
        .route(
            "/",
            get(move || {
                let location = swagger_path.clone();
                async move { (StatusCode::FOUND, [(header::LOCATION, location)]).into_response() }
            }),
        )
        .merge(
            SwaggerUi::new(config.swagger_path.clone())
                .config(utoipa_swagger_ui::Config::from(OPENAPI_URL)),
        )
        .nest_service("/static", static_files)
}
