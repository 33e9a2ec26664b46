//! Favorites endpoints

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
use crate::db::{
    favorites::{self, ToggleOutcome},
    products,
};
use crate::error::{ApiResponse, AppError, ErrorCode, ServiceError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleFavoriteRequest {
    pub product_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteProduct {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteView {
    pub id: Uuid,
    pub product_id: Uuid,
    pub is_favorite: bool,
    pub product: FavoriteProduct,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteStatus {
    pub is_favorite: bool,
}

/// Toggle a product in and out of the user's favorites.
/// 201 when added, 200 when removed.
pub async fn toggle_favorite(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidJson(body): ValidJson<ToggleFavoriteRequest>,
) -> Result<Response, ServiceError> {
    let product_id = parse_uuid(&body.product_id, "productId")?;

    if !products::exists(&state.pool, product_id).await? {
        return Err(AppError::new(ErrorCode::ProductNotFound).into());
    }

    match favorites::toggle(&state.pool, &user.id, product_id).await? {
        ToggleOutcome::Added(favorite) => Ok((
            StatusCode::CREATED,
            Json(ApiResponse::success_with_message(
                favorite,
                "Product added to favorites",
            )),
        )
            .into_response()),
        ToggleOutcome::Removed => Ok(Json(ApiResponse::message_only(
            "Product removed from favorites",
        ))
        .into_response()),
    }
}

pub async fn list_favorites(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Vec<FavoriteView>> {
    let lines = favorites::list_with_products(&state.pool, &user.id).await?;

    let views = lines
        .into_iter()
        .map(|line| FavoriteView {
            id: line.id,
            product_id: line.product_id,
            is_favorite: line.is_favorite,
            product: FavoriteProduct {
                id: line.product_id,
                name: line.product_name,
                price: line.price,
                image_url: line.image_url,
                description: line.description,
            },
        })
        .collect();

    Ok(Json(ApiResponse::success(views)))
}

pub async fn get_favorite(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(product_id): Path<String>,
) -> ApiResult<FavoriteStatus> {
    let product_id = parse_uuid(&product_id, "productId")?;

    let favorite = favorites::find(&state.pool, &user.id, product_id).await?;

    Ok(Json(ApiResponse::success(FavoriteStatus {
        is_favorite: favorite.is_some(),
    })))
}

pub async fn remove_favorite(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(product_id): Path<String>,
) -> ApiResult<()> {
    let product_id = parse_uuid(&product_id, "productId")?;

    if !favorites::remove(&state.pool, &user.id, product_id).await? {
        return Err(AppError::new(ErrorCode::FavoriteNotFound).into());
    }

    Ok(Json(ApiResponse::message_only(
        "Product removed from favorites",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_request_deserializes() {
        let body: ToggleFavoriteRequest =
            serde_json::from_str(r#"{"productId": "c56a4180-65aa-42ec-a945-5fd21dec0538"}"#)
                .unwrap();
        assert_eq!(body.product_id, "c56a4180-65aa-42ec-a945-5fd21dec0538");
    }

    #[test]
    fn test_favorite_status_serializes_camel_case() {
        let json = serde_json::to_value(FavoriteStatus { is_favorite: true }).unwrap();
        assert_eq!(json["isFavorite"], true);
    }
}
