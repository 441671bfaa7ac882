use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;

use lumiere_catalog::Product;
use lumiere_core::{DomainError, ProductId, SessionId};

use crate::app::dto::{self, AddToCartRequest, SetQuantityRequest};
use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::RequestContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_session))
        .route("/:id", get(get_session).delete(delete_session))
        .route("/:id/cart", post(add_to_cart))
        .route("/:id/cart/:product_id", put(set_quantity).delete(remove_from_cart))
        .route("/:id/wishlist/:product_id", post(toggle_wishlist))
}

type HandlerResult<T> = Result<T, axum::response::Response>;

fn parse_session_id(raw: &str) -> HandlerResult<SessionId> {
    raw.parse()
        .map_err(|_| errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid session id"))
}

fn parse_product_id(raw: impl Into<String>) -> HandlerResult<ProductId> {
    ProductId::parse(raw).map_err(errors::domain_error_to_response)
}

fn catalog_product(services: &AppServices, id: &ProductId) -> HandlerResult<Product> {
    services
        .catalog
        .product_by_id(id)
        .cloned()
        .ok_or_else(|| errors::domain_error_to_response(DomainError::not_found(format!("product {id}"))))
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> HandlerResult<T> {
    payload
        .map(|Json(v)| v)
        .map_err(|e| errors::json_error(StatusCode::BAD_REQUEST, "invalid_body", e.body_text()))
}

pub async fn create_session(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
) -> axum::response::Response {
    let session = services.sessions.create();
    tracing::info!(session_id = %session.id, request_id = %ctx.request_id(), "session opened");
    (StatusCode::CREATED, Json(dto::session_to_json(&session))).into_response()
}

pub async fn get_session(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_session_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.sessions.get(id) {
        Some(session) => (StatusCode::OK, Json(dto::session_to_json(&session))).into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "session not found"),
    }
}

pub async fn delete_session(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_session_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    if services.sessions.remove(id) {
        StatusCode::NO_CONTENT.into_response()
    } else {
        errors::json_error(StatusCode::NOT_FOUND, "not_found", "session not found")
    }
}

pub async fn add_to_cart(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    payload: Result<Json<AddToCartRequest>, JsonRejection>,
) -> axum::response::Response {
    let (id, req) = match parse_session_id(&id).and_then(|id| Ok((id, body(payload)?))) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let product = match parse_product_id(req.product_id).and_then(|pid| catalog_product(&services, &pid)) {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    let result = services.sessions.update(id, &mut |session| {
        let now = Utc::now();
        session.cart.add(&product, req.quantity, now)?;
        session.updated_at = now;
        Ok(())
    });

    match result {
        Ok(session) => {
            tracing::info!(session_id = %id, product_id = %product.id, quantity = req.quantity, "added to cart");
            (StatusCode::OK, Json(dto::session_to_json(&session))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn set_quantity(
    Extension(services): Extension<Arc<AppServices>>,
    Path((id, product_id)): Path<(String, String)>,
    payload: Result<Json<SetQuantityRequest>, JsonRejection>,
) -> axum::response::Response {
    let (id, product_id, req) = match parse_session_id(&id)
        .and_then(|id| Ok((id, parse_product_id(product_id)?, body(payload)?)))
    {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let result = services.sessions.update(id, &mut |session| {
        session.cart.set_quantity(&product_id, req.quantity)?;
        session.updated_at = Utc::now();
        Ok(())
    });

    match result {
        Ok(session) => (StatusCode::OK, Json(dto::session_to_json(&session))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn remove_from_cart(
    Extension(services): Extension<Arc<AppServices>>,
    Path((id, product_id)): Path<(String, String)>,
) -> axum::response::Response {
    let (id, product_id) = match parse_session_id(&id).and_then(|id| Ok((id, parse_product_id(product_id)?))) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let result = services.sessions.update(id, &mut |session| {
        if !session.cart.remove(&product_id) {
            return Err(DomainError::not_found(format!("cart line {product_id}")));
        }
        session.updated_at = Utc::now();
        Ok(())
    });

    match result {
        Ok(session) => (StatusCode::OK, Json(dto::session_to_json(&session))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Add the product to the wishlist, or take it out if it is already there.
pub async fn toggle_wishlist(
    Extension(services): Extension<Arc<AppServices>>,
    Path((id, product_id)): Path<(String, String)>,
) -> axum::response::Response {
    let (id, product) = match parse_session_id(&id).and_then(|id| {
        let pid = parse_product_id(product_id)?;
        Ok((id, catalog_product(&services, &pid)?))
    }) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let mut wishlisted = false;
    let result = services.sessions.update(id, &mut |session| {
        wishlisted = session.wishlist.toggle(product.id.clone());
        session.updated_at = Utc::now();
        Ok(())
    });

    match result {
        Ok(session) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "product_id": product.id.to_string(),
                "wishlisted": wishlisted,
                "session": dto::session_to_json(&session),
            })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
