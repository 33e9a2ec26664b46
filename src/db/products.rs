//! Product catalog queries (read-only from this service's perspective)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub is_popular: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Sort field for catalog listings, restricted to a column whitelist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ProductSort {
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "price")]
    Price,
    #[serde(rename = "createdAt")]
    CreatedAt,
}

impl ProductSort {
    pub fn column(self) -> &'static str {
        match self {
            ProductSort::Name => "name",
            ProductSort::Price => "price",
            ProductSort::CreatedAt => "created_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn keyword(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM products WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await
}

/// Paginated catalog listing with optional name search.
///
/// `sort`/`order` interpolate from fixed whitelists only.
pub async fn list(
    pool: &PgPool,
    sort: ProductSort,
    order: SortOrder,
    search: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Product>, sqlx::Error> {
    let order_by = format!("ORDER BY {} {}", sort.column(), order.keyword());

    match search {
        Some(term) => {
            sqlx::query_as(&format!(
                "SELECT * FROM products WHERE name ILIKE $1 {order_by} LIMIT $2 OFFSET $3"
            ))
            .bind(format!("%{term}%"))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as(&format!(
                "SELECT * FROM products {order_by} LIMIT $1 OFFSET $2"
            ))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
        }
    }
}

pub async fn count(pool: &PgPool, search: Option<&str>) -> Result<i64, sqlx::Error> {
    match search {
        Some(term) => {
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE name ILIKE $1")
                .bind(format!("%{term}%"))
                .fetch_one(pool)
                .await
        }
        None => {
            sqlx::query_scalar("SELECT COUNT(*) FROM products")
                .fetch_one(pool)
                .await
        }
    }
}

/// Popular products, newest first
pub async fn popular(pool: &PgPool, limit: i64) -> Result<Vec<Product>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM products WHERE is_popular = TRUE ORDER BY created_at DESC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_columns_are_whitelisted() {
        assert_eq!(ProductSort::Name.column(), "name");
        assert_eq!(ProductSort::Price.column(), "price");
        assert_eq!(ProductSort::CreatedAt.column(), "created_at");
        assert_eq!(SortOrder::Asc.keyword(), "ASC");
        assert_eq!(SortOrder::Desc.keyword(), "DESC");
    }

    #[test]
    fn test_sort_deserializes_camel_case() {
        let sort: ProductSort = serde_json::from_str("\"createdAt\"").unwrap();
        assert_eq!(sort, ProductSort::CreatedAt);

        let order: SortOrder = serde_json::from_str("\"desc\"").unwrap();
        assert_eq!(order, SortOrder::Desc);

        assert!(serde_json::from_str::<ProductSort>("\"created_at\"").is_err());
    }
}
