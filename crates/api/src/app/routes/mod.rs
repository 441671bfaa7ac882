use axum::Router;

pub mod categories;
pub mod products;
pub mod sessions;
pub mod system;

/// Router for all storefront endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/products", products::router())
        .nest("/categories", categories::router())
        .nest("/sessions", sessions::router())
}
