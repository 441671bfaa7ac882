use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::app::dto::{self, ListingQuery};
use crate::app::errors;
use crate::app::routes::products::listing;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_categories))
        .route("/:slug/products", get(category_products))
}

pub async fn list_categories(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let items = services
        .catalog
        .category_counts()
        .into_iter()
        .map(|(category, n)| dto::category_to_json(category, n))
        .collect::<Vec<_>>();
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

pub async fn category_products(
    Extension(services): Extension<Arc<AppServices>>,
    Path(slug): Path<String>,
    query: Result<Query<ListingQuery>, QueryRejection>,
) -> axum::response::Response {
    match services.catalog.products_in_category(&slug) {
        Ok(products) => listing(&services.catalog, products, query),
        Err(e) => errors::domain_error_to_response(e),
    }
}
