//! HTTP surface: route table and shared handler plumbing

use axum::{
    Json, Router,
    extract::{FromRequest, FromRequestParts, Query, Request},
    middleware,
    routing::{delete, get, post, put},
};
use http::request::Parts;
use serde::de::DeserializeOwned;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth::session_middleware;
use crate::error::{ApiResponse, AppError, ServiceError};
use crate::state::AppState;

mod cart;
mod favorites;
mod health;
mod orders;
mod payments;
mod products;

/// Handlers return the envelope directly; `?` covers both database and
/// application failures through [`ServiceError`]
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ServiceError>;

/// Parse a path segment as a UUID, surfacing a validation error naming the
/// offending field
pub(crate) fn parse_uuid(raw: &str, field: &str) -> Result<Uuid, AppError> {
    raw.parse().map_err(|_| {
        AppError::validation(format!("Invalid {field}"))
            .with_details(serde_json::json!({ "field": field }))
    })
}

/// JSON body extractor whose rejection is the standard error envelope
/// instead of axum's plain-text response
#[derive(Debug)]
pub(crate) struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::validation(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Query-string extractor with the same envelope-shaped rejection
#[derive(Debug)]
pub(crate) struct ValidQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::validation(rejection.body_text()))?;
        Ok(Self(value))
    }
}

pub fn create_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(health::health_check))
        .route("/api/products", get(products::list_products))
        .route("/api/products/popular", get(products::popular_products))
        .route("/api/products/{id}", get(products::get_product));

    let protected = Router::new()
        .route("/api/cart", get(cart::get_cart))
        .route("/api/cart/add", post(cart::add_to_cart))
        .route("/api/cart/{id}", put(cart::update_cart_item))
        .route("/api/cart/{id}", delete(cart::remove_cart_item))
        .route("/api/orders/create", post(orders::create_order))
        .route("/api/orders", get(orders::list_orders))
        .route("/api/orders/{id}", get(orders::get_order))
        .route("/api/payments", post(payments::create_payment))
        .route(
            "/api/payments/{order_id}/status",
            get(payments::payment_status),
        )
        .route("/api/favorites", post(favorites::toggle_favorite))
        .route("/api/favorites", get(favorites::list_favorites))
        .route("/api/favorites/{product_id}", get(favorites::get_favorite))
        .route(
            "/api/favorites/{product_id}",
            delete(favorites::remove_favorite),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ));

    public
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use axum::body::Body;
    use serde::Deserialize;

    #[test]
    fn test_parse_uuid_valid() {
        let id = parse_uuid("c56a4180-65aa-42ec-a945-5fd21dec0538", "productId").unwrap();
        assert_eq!(id.to_string(), "c56a4180-65aa-42ec-a945-5fd21dec0538");
    }

    #[test]
    fn test_parse_uuid_invalid() {
        let err = parse_uuid("not-a-uuid", "orderId").unwrap_err();
        assert_eq!(err.message, "Invalid orderId");
        assert_eq!(err.details.unwrap()["field"], "orderId");
    }

    #[derive(Debug, Deserialize)]
    struct PageQuery {
        page: i64,
    }

    #[tokio::test]
    async fn test_query_rejection_is_validation_error() {
        let req = Request::builder()
            .uri("/api/orders?page=abc")
            .body(Body::empty())
            .unwrap();
        let (mut parts, _) = req.into_parts();

        let err = ValidQuery::<PageQuery>::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn test_query_accepts_valid_input() {
        let req = Request::builder()
            .uri("/api/orders?page=3")
            .body(Body::empty())
            .unwrap();
        let (mut parts, _) = req.into_parts();

        let ValidQuery(query) = ValidQuery::<PageQuery>::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(query.page, 3);
    }

    #[tokio::test]
    async fn test_json_rejection_is_validation_error() {
        let req = Request::builder()
            .method("POST")
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let err = ValidJson::<serde_json::Value>::from_request(req, &())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);
    }
}
