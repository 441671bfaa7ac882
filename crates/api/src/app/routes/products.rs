use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use lumiere_catalog::{BrowseSession, Catalog, Product};

use crate::app::dto::ListingQuery;
use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products))
        .route("/:slug", get(get_product))
}

/// Run a listing query over `products` and render the resulting view.
///
/// Shared by the all-products page and the category pages.
pub(crate) fn listing(
    catalog: &Catalog,
    products: Vec<Product>,
    query: Result<Query<ListingQuery>, QueryRejection>,
) -> axum::response::Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_query", e.body_text()),
    };

    let mut session = BrowseSession::new(products);
    let page = match query.apply_to(&mut session, catalog) {
        Ok(p) => p,
        Err(e) => return errors::domain_error_to_response(e),
    };

    (StatusCode::OK, Json(session.view(page))).into_response()
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<ListingQuery>, QueryRejection>,
) -> axum::response::Response {
    listing(&services.catalog, services.catalog.products().to_vec(), query)
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(slug): Path<String>,
) -> axum::response::Response {
    match services.catalog.product_by_slug(&slug) {
        Some(product) => (StatusCode::OK, Json(product)).into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "product not found"),
    }
}
