//! Product catalog endpoints (public, no session required)

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use super::{ApiResult, ValidQuery, parse_uuid};
use crate::db::products::{self, Product, ProductSort, SortOrder};
use crate::error::{ApiResponse, AppError, ErrorCode, Pagination};
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;
const POPULAR_DEFAULT_LIMIT: i64 = 10;
const POPULAR_MAX_LIMIT: i64 = 50;

#[derive(Debug, Deserialize)]
pub struct ListProductsQuery {
    page: Option<i64>,
    limit: Option<i64>,
    sort: Option<ProductSort>,
    order: Option<SortOrder>,
    search: Option<String>,
}

pub async fn list_products(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<ListProductsQuery>,
) -> ApiResult<Vec<Product>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let offset = (page - 1) * limit;

    let sort = query.sort.unwrap_or(ProductSort::Name);
    let order = query.order.unwrap_or(SortOrder::Asc);
    let search = query.search.as_deref().filter(|s| !s.trim().is_empty());

    let items = products::list(&state.pool, sort, order, search, limit, offset).await?;
    let total = products::count(&state.pool, search).await?;

    Ok(Json(ApiResponse::paginated(
        items,
        Pagination::new(page, limit, total),
    )))
}

#[derive(Debug, Deserialize)]
pub struct PopularProductsQuery {
    limit: Option<i64>,
}

pub async fn popular_products(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<PopularProductsQuery>,
) -> ApiResult<Vec<Product>> {
    let limit = query
        .limit
        .unwrap_or(POPULAR_DEFAULT_LIMIT)
        .clamp(1, POPULAR_MAX_LIMIT);

    let items = products::popular(&state.pool, limit).await?;
    Ok(Json(ApiResponse::success(items)))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Product> {
    let id = parse_uuid(&id, "productId")?;

    let product = products::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;

    Ok(Json(ApiResponse::success(product)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(query: &str) -> ListProductsQuery {
        serde_urlencoded::from_str(query).unwrap()
    }

    #[test]
    fn test_query_defaults() {
        let q = parse("");
        assert!(q.page.is_none());
        assert!(q.limit.is_none());
        assert!(q.sort.is_none());
        assert!(q.search.is_none());
    }

    #[test]
    fn test_query_full() {
        let q = parse("page=2&limit=25&sort=price&order=desc&search=pizza");
        assert_eq!(q.page, Some(2));
        assert_eq!(q.limit, Some(25));
        assert_eq!(q.sort, Some(ProductSort::Price));
        assert_eq!(q.order, Some(SortOrder::Desc));
        assert_eq!(q.search.as_deref(), Some("pizza"));
    }

    #[test]
    fn test_page_and_limit_clamping() {
        assert_eq!((-3i64).max(1), 1);
        assert_eq!(500i64.clamp(1, MAX_PAGE_SIZE), 100);
        assert_eq!(0i64.clamp(1, MAX_PAGE_SIZE), 1);
    }

    #[test]
    fn test_popular_limit_bounds() {
        let q: PopularProductsQuery = serde_urlencoded::from_str("limit=25").unwrap();
        assert_eq!(q.limit, Some(25));

        let q: PopularProductsQuery = serde_urlencoded::from_str("").unwrap();
        assert_eq!(q.limit.unwrap_or(POPULAR_DEFAULT_LIMIT), 10);

        assert_eq!(200i64.clamp(1, POPULAR_MAX_LIMIT), 50);
        assert_eq!(0i64.clamp(1, POPULAR_MAX_LIMIT), 1);
    }
}
