//! Favorites: toggle membership keyed on the (user, product) uniqueness

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: Uuid,
    pub user_id: String,
    pub product_id: Uuid,
    pub is_favorite: bool,
}

/// Favorite joined with its product, for listings
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FavoriteLine {
    pub id: Uuid,
    pub product_id: Uuid,
    pub is_favorite: bool,
    pub product_name: String,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug)]
pub enum ToggleOutcome {
    Added(Favorite),
    Removed,
}

/// Toggle favorite membership: remove the row if present, insert otherwise.
/// The unique constraint absorbs concurrent toggles; a lost insert race
/// reads back the surviving row.
pub async fn toggle(
    pool: &PgPool,
    user_id: &str,
    product_id: Uuid,
) -> Result<ToggleOutcome, sqlx::Error> {
    let removed = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND product_id = $2")
        .bind(user_id)
        .bind(product_id)
        .execute(pool)
        .await?;

    if removed.rows_affected() > 0 {
        return Ok(ToggleOutcome::Removed);
    }

    let inserted: Option<Favorite> = sqlx::query_as(
        "INSERT INTO favorites (user_id, product_id, is_favorite)
         VALUES ($1, $2, TRUE)
         ON CONFLICT (user_id, product_id) DO NOTHING
         RETURNING *",
    )
    .bind(user_id)
    .bind(product_id)
    .fetch_optional(pool)
    .await?;

    match inserted {
        Some(favorite) => Ok(ToggleOutcome::Added(favorite)),
        None => {
            let existing: Favorite =
                sqlx::query_as("SELECT * FROM favorites WHERE user_id = $1 AND product_id = $2")
                    .bind(user_id)
                    .bind(product_id)
                    .fetch_one(pool)
                    .await?;
            Ok(ToggleOutcome::Added(existing))
        }
    }
}

/// The user's favorites with product details, ordered by product name
pub async fn list_with_products(
    pool: &PgPool,
    user_id: &str,
) -> Result<Vec<FavoriteLine>, sqlx::Error> {
    sqlx::query_as(
        "SELECT f.id, f.product_id, f.is_favorite,
                p.name AS product_name, p.price, p.image_url, p.description
         FROM favorites f
         JOIN products p ON p.id = f.product_id
         WHERE f.user_id = $1
         ORDER BY p.name",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn find(
    pool: &PgPool,
    user_id: &str,
    product_id: Uuid,
) -> Result<Option<Favorite>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM favorites WHERE user_id = $1 AND product_id = $2")
        .bind(user_id)
        .bind(product_id)
        .fetch_optional(pool)
        .await
}

/// Owner-scoped removal by product; false when nothing matched
pub async fn remove(pool: &PgPool, user_id: &str, product_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND product_id = $2")
        .bind(user_id)
        .bind(product_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
