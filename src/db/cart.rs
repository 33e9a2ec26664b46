//! Cart storage: atomic add/merge, owner-scoped update/remove, joined reads

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: Uuid,
    pub user_id: String,
    pub product_id: Uuid,
    pub quantity: i32,
    pub added_at: i64,
}

/// One cart line joined with its product, for display and order placement
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CartLine {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub added_at: i64,
    pub product_name: String,
    pub price: Decimal,
    pub image_url: Option<String>,
}

/// Result of an add: the stored row plus whether it was freshly inserted
/// (drives 201 vs 200 at the API boundary)
#[derive(Debug)]
pub struct CartUpsert {
    pub item: CartItem,
    pub inserted: bool,
}

#[derive(sqlx::FromRow)]
struct CartUpsertRow {
    id: Uuid,
    user_id: String,
    product_id: Uuid,
    quantity: i32,
    added_at: i64,
    inserted: bool,
}

/// Insert a cart line or merge quantities when one exists for
/// (user, product). A single statement, so concurrent adds cannot
/// duplicate rows; `xmax = 0` distinguishes insert from merge.
pub async fn upsert(
    pool: &PgPool,
    user_id: &str,
    product_id: Uuid,
    quantity: i32,
    now: i64,
) -> Result<CartUpsert, sqlx::Error> {
    let row: CartUpsertRow = sqlx::query_as(
        r#"
        INSERT INTO cart_items (user_id, product_id, quantity, added_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id, product_id)
        DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity
        RETURNING id, user_id, product_id, quantity, added_at, (xmax = 0) AS inserted
        "#,
    )
    .bind(user_id)
    .bind(product_id)
    .bind(quantity)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(CartUpsert {
        item: CartItem {
            id: row.id,
            user_id: row.user_id,
            product_id: row.product_id,
            quantity: row.quantity,
            added_at: row.added_at,
        },
        inserted: row.inserted,
    })
}

/// Overwrite a cart line's quantity, scoped to the owning user.
/// Returns None when the line is absent or owned by someone else.
pub async fn update_quantity(
    pool: &PgPool,
    user_id: &str,
    cart_item_id: Uuid,
    quantity: i32,
) -> Result<Option<CartItem>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE cart_items SET quantity = $1
         WHERE id = $2 AND user_id = $3
         RETURNING id, user_id, product_id, quantity, added_at",
    )
    .bind(quantity)
    .bind(cart_item_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Owner-scoped delete; false when nothing matched
pub async fn delete(pool: &PgPool, user_id: &str, cart_item_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM cart_items WHERE id = $1 AND user_id = $2")
        .bind(cart_item_id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Cart lines joined with product details, oldest first
pub async fn list_with_products(
    pool: &PgPool,
    user_id: &str,
) -> Result<Vec<CartLine>, sqlx::Error> {
    sqlx::query_as(
        "SELECT ci.id, ci.product_id, ci.quantity, ci.added_at,
                p.name AS product_name, p.price, p.image_url
         FROM cart_items ci
         JOIN products p ON p.id = ci.product_id
         WHERE ci.user_id = $1
         ORDER BY ci.added_at",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
