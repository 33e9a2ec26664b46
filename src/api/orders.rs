//! Order endpoints: placement and history

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Extension, Path, State},
    response::{IntoResponse, Response},
};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ApiResult, ValidQuery, parse_uuid};
use crate::auth::CurrentUser;
use crate::db::orders::{self, Order, OrderItem};
use crate::error::{ApiResponse, AppError, ErrorCode, Pagination, ServiceError};
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;

/// Order with its line items, the shape every order endpoint responds with
#[derive(Debug, Serialize)]
pub struct OrderView {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    Placed,
    Confirmed,
    Completed,
}

impl StatusFilter {
    fn as_str(self) -> &'static str {
        match self {
            StatusFilter::Placed => orders::status::PLACED,
            StatusFilter::Confirmed => orders::status::CONFIRMED,
            StatusFilter::Completed => orders::status::COMPLETED,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListOrdersQuery {
    page: Option<i64>,
    limit: Option<i64>,
    status: Option<StatusFilter>,
}

pub async fn create_order(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Response, ServiceError> {
    let (order, items) = orders::place_order(&state.pool, &user.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            OrderView { order, items },
            "Order placed successfully",
        )),
    )
        .into_response())
}

pub async fn list_orders(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidQuery(query): ValidQuery<ListOrdersQuery>,
) -> ApiResult<Vec<OrderView>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let offset = (page - 1) * limit;
    let status = query.status.map(StatusFilter::as_str);

    let page_orders = orders::list(&state.pool, &user.id, status, limit, offset).await?;
    let total = orders::count(&state.pool, &user.id, status).await?;

    let order_ids: Vec<Uuid> = page_orders.iter().map(|o| o.id).collect();
    let mut items_by_order: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
    for item in orders::items_for_orders(&state.pool, &order_ids).await? {
        items_by_order.entry(item.order_id).or_default().push(item);
    }

    let views = page_orders
        .into_iter()
        .map(|order| {
            let items = items_by_order.remove(&order.id).unwrap_or_default();
            OrderView { order, items }
        })
        .collect();

    Ok(Json(ApiResponse::paginated(
        views,
        Pagination::new(page, limit, total),
    )))
}

pub async fn get_order(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<OrderView> {
    let id = parse_uuid(&id, "orderId")?;

    let order = orders::find_by_id(&state.pool, &user.id, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
    let items = orders::items_for_order(&state.pool, id).await?;

    Ok(Json(ApiResponse::success(OrderView { order, items })))
}
