//! Cart endpoints

use axum::{
    Json,
    extract::{Extension, Path, State},
    response::{IntoResponse, Response},
};
use http::StatusCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ApiResult, ValidJson, parse_uuid};
use crate::auth::CurrentUser;
use crate::db::{cart, orders, products};
use crate::error::{ApiResponse, AppError, ErrorCode, ServiceError};
use crate::state::AppState;
use crate::util::now_millis;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: String,
    pub quantity: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCartItemRequest {
    pub quantity: i32,
}

/// Product fields echoed inside each cart line
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemView {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub added_at: i64,
    pub product: ProductSummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: Decimal,
    pub tax_and_fees: Decimal,
    pub total: Decimal,
}

fn validate_quantity(quantity: i32) -> Result<(), AppError> {
    if quantity < 1 {
        return Err(
            AppError::validation("Quantity must be at least 1")
                .with_details(serde_json::json!({ "field": "quantity" })),
        );
    }
    Ok(())
}

pub async fn get_cart(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<CartView> {
    let lines = cart::list_with_products(&state.pool, &user.id).await?;

    let totals = orders::compute_totals(lines.iter().map(|l| (l.price, l.quantity)));
    let items = lines
        .into_iter()
        .map(|line| CartItemView {
            id: line.id,
            product_id: line.product_id,
            quantity: line.quantity,
            added_at: line.added_at,
            product: ProductSummary {
                id: line.product_id,
                name: line.product_name,
                price: line.price,
                image_url: line.image_url,
            },
        })
        .collect();

    Ok(Json(ApiResponse::success(CartView {
        items,
        subtotal: totals.subtotal,
        tax_and_fees: totals.gst,
        total: totals.total,
    })))
}

/// Add a product to the cart, merging quantities when it is already there.
/// 201 for a fresh line, 200 for a merge.
pub async fn add_to_cart(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidJson(body): ValidJson<AddToCartRequest>,
) -> Result<Response, ServiceError> {
    validate_quantity(body.quantity)?;
    let product_id = parse_uuid(&body.product_id, "productId")?;

    if !products::exists(&state.pool, product_id).await? {
        return Err(AppError::new(ErrorCode::ProductNotFound).into());
    }

    let upsert =
        cart::upsert(&state.pool, &user.id, product_id, body.quantity, now_millis()).await?;

    let (status, message) = if upsert.inserted {
        (StatusCode::CREATED, "Item added to cart")
    } else {
        (StatusCode::OK, "Cart item quantity updated")
    };

    Ok((
        status,
        Json(ApiResponse::success_with_message(upsert.item, message)),
    )
        .into_response())
}

pub async fn update_cart_item(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    ValidJson(body): ValidJson<UpdateCartItemRequest>,
) -> ApiResult<cart::CartItem> {
    validate_quantity(body.quantity)?;
    let id = parse_uuid(&id, "cartItemId")?;

    let item = cart::update_quantity(&state.pool, &user.id, id, body.quantity)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CartItemNotFound))?;

    Ok(Json(ApiResponse::success_with_message(
        item,
        "Cart item updated successfully",
    )))
}

pub async fn remove_cart_item(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_uuid(&id, "cartItemId")?;

    if !cart::delete(&state.pool, &user.id, id).await? {
        return Err(AppError::new(ErrorCode::CartItemNotFound).into());
    }

    Ok(Json(ApiResponse::message_only(
        "Cart item removed successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_request_deserializes_camel_case() {
        let body: AddToCartRequest = serde_json::from_str(
            r#"{"productId": "c56a4180-65aa-42ec-a945-5fd21dec0538", "quantity": 2}"#,
        )
        .unwrap();
        assert_eq!(body.quantity, 2);
        assert_eq!(body.product_id, "c56a4180-65aa-42ec-a945-5fd21dec0538");
    }

    #[test]
    fn test_quantity_validation() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(10).is_ok());

        let err = validate_quantity(0).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.details.unwrap()["field"], "quantity");

        assert!(validate_quantity(-5).is_err());
    }
}
