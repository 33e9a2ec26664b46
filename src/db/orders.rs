//! Order storage and the order placement workflow
//!
//! Placement runs as one transaction: load cart lines, compute totals,
//! allocate unique order/token numbers, snapshot the lines, clear the cart.
//! A failure at any step leaves both the cart and the order tables untouched.

use rand::Rng;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use sqlx::{Acquire, PgPool};
use uuid::Uuid;

use crate::error::{AppError, ErrorCode, ServiceResult};
use crate::util::now_millis;

/// GST applied to every order subtotal, as a fraction (5%)
fn gst_rate() -> Decimal {
    Decimal::new(5, 2)
}

/// Retry budget for drawing an unused (order_number, token_number) pair.
/// The keyspace is 90 x 900 per prefix; hitting the cap means it is close
/// to exhausted and the client should retry later.
const MAX_NUMBER_ATTEMPTS: u32 = 20;

const ORDER_NUMBER_PREFIX: &str = "MFP";

pub mod status {
    pub const PLACED: &str = "placed";
    pub const CONFIRMED: &str = "confirmed";
    pub const COMPLETED: &str = "completed";
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub user_id: String,
    pub order_number: String,
    pub token_number: String,
    pub subtotal: Decimal,
    pub gst: Decimal,
    pub total: Decimal,
    pub order_date: i64,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub price: Decimal,
    pub quantity: i32,
}

/// Cart line snapshot used during placement
#[derive(Debug, sqlx::FromRow)]
struct PlacementLine {
    product_id: Uuid,
    quantity: i32,
    product_name: String,
    price: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub gst: Decimal,
    pub total: Decimal,
}

/// Exact fixed-point totals: subtotal is the sum of price x quantity,
/// GST is 5% rounded to two decimals (midpoint away from zero),
/// total is their sum.
pub fn compute_totals<I>(lines: I) -> OrderTotals
where
    I: IntoIterator<Item = (Decimal, i32)>,
{
    let subtotal: Decimal = lines
        .into_iter()
        .map(|(price, quantity)| price * Decimal::from(quantity))
        .sum();
    let gst =
        (subtotal * gst_rate()).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let total = subtotal + gst;
    OrderTotals {
        subtotal,
        gst,
        total,
    }
}

fn draw_order_identifiers() -> (String, String) {
    let mut rng = rand::thread_rng();
    let order_number = format!("{ORDER_NUMBER_PREFIX}{}", rng.gen_range(10..=99));
    let token_number = format!("#{}", rng.gen_range(100..=999));
    (order_number, token_number)
}

/// Convert the user's cart into a persisted order with line snapshots.
///
/// Fails with `CartEmpty` when there is nothing to order and with
/// `OrderNumberExhausted` when the identifier retry budget runs out.
pub async fn place_order(
    pool: &PgPool,
    user_id: &str,
) -> ServiceResult<(Order, Vec<OrderItem>)> {
    let mut tx = pool.begin().await?;

    let lines: Vec<PlacementLine> = sqlx::query_as(
        "SELECT ci.product_id, ci.quantity, p.name AS product_name, p.price
         FROM cart_items ci
         JOIN products p ON p.id = ci.product_id
         WHERE ci.user_id = $1
         ORDER BY ci.added_at",
    )
    .bind(user_id)
    .fetch_all(&mut *tx)
    .await?;

    if lines.is_empty() {
        return Err(AppError::new(ErrorCode::CartEmpty).into());
    }

    let totals = compute_totals(lines.iter().map(|l| (l.price, l.quantity)));
    let now = now_millis();

    // Allocate a unique (order_number, token_number) pair by inserting and
    // retrying on constraint violation. Each attempt runs in a savepoint so
    // a clash does not poison the outer transaction; a clash on either
    // column redraws both.
    let mut order: Option<Order> = None;
    for attempt in 0..MAX_NUMBER_ATTEMPTS {
        let (order_number, token_number) = draw_order_identifiers();

        let mut savepoint = tx.begin().await?;
        let inserted: Result<Order, sqlx::Error> = sqlx::query_as(
            "INSERT INTO orders
                 (user_id, order_number, token_number, subtotal, gst, total, order_date, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING *",
        )
        .bind(user_id)
        .bind(&order_number)
        .bind(&token_number)
        .bind(totals.subtotal)
        .bind(totals.gst)
        .bind(totals.total)
        .bind(now)
        .bind(status::COMPLETED)
        .fetch_one(&mut *savepoint)
        .await;

        match inserted {
            Ok(o) => {
                savepoint.commit().await?;
                order = Some(o);
                break;
            }
            Err(e) if super::is_unique_violation(&e) => {
                savepoint.rollback().await?;
                tracing::debug!(
                    attempt,
                    %order_number,
                    %token_number,
                    "Order identifier clash, redrawing"
                );
            }
            Err(e) => return Err(e.into()),
        }
    }

    let Some(order) = order else {
        return Err(AppError::new(ErrorCode::OrderNumberExhausted).into());
    };

    // Snapshot each cart line: the copied name/price keep historical orders
    // immune to later catalog edits.
    let mut items = Vec::with_capacity(lines.len());
    for line in &lines {
        let item: OrderItem = sqlx::query_as(
            "INSERT INTO order_items (order_id, product_id, product_name, price, quantity)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(order.id)
        .bind(line.product_id)
        .bind(&line.product_name)
        .bind(line.price)
        .bind(line.quantity)
        .fetch_one(&mut *tx)
        .await?;
        items.push(item);
    }

    sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(
        order_id = %order.id,
        order_number = %order.order_number,
        %user_id,
        total = %order.total,
        "Order placed"
    );

    Ok((order, items))
}

/// A page of the user's orders, newest first, optionally filtered by status
pub async fn list(
    pool: &PgPool,
    user_id: &str,
    status: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Order>, sqlx::Error> {
    match status {
        Some(s) => {
            sqlx::query_as(
                "SELECT * FROM orders WHERE user_id = $1 AND status = $2
                 ORDER BY order_date DESC LIMIT $3 OFFSET $4",
            )
            .bind(user_id)
            .bind(s)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as(
                "SELECT * FROM orders WHERE user_id = $1
                 ORDER BY order_date DESC LIMIT $2 OFFSET $3",
            )
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
        }
    }
}

pub async fn count(
    pool: &PgPool,
    user_id: &str,
    status: Option<&str>,
) -> Result<i64, sqlx::Error> {
    match status {
        Some(s) => {
            sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE user_id = $1 AND status = $2")
                .bind(user_id)
                .bind(s)
                .fetch_one(pool)
                .await
        }
        None => {
            sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(pool)
                .await
        }
    }
}

/// Order lookup scoped to the owning user
pub async fn find_by_id(
    pool: &PgPool,
    user_id: &str,
    order_id: Uuid,
) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders WHERE id = $1 AND user_id = $2")
        .bind(order_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn items_for_order(pool: &PgPool, order_id: Uuid) -> Result<Vec<OrderItem>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM order_items WHERE order_id = $1")
        .bind(order_id)
        .fetch_all(pool)
        .await
}

/// Line items for a batch of orders (one query for a whole listing page)
pub async fn items_for_orders(
    pool: &PgPool,
    order_ids: &[Uuid],
) -> Result<Vec<OrderItem>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM order_items WHERE order_id = ANY($1)")
        .bind(order_ids)
        .fetch_all(pool)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_totals_reference_scenario() {
        // 2 x 100.00 + 1 x 50.00
        let totals = compute_totals([(dec("100.00"), 2), (dec("50.00"), 1)]);
        assert_eq!(totals.subtotal, dec("250.00"));
        assert_eq!(totals.gst, dec("12.50"));
        assert_eq!(totals.total, dec("262.50"));
    }

    #[test]
    fn test_totals_sum_invariant() {
        let cases = [
            vec![(dec("9.99"), 3)],
            vec![(dec("0.10"), 1)],
            vec![(dec("12.34"), 2), (dec("56.78"), 5), (dec("0.01"), 7)],
        ];
        for lines in cases {
            let totals = compute_totals(lines.clone());
            let subtotal: Decimal = lines
                .iter()
                .map(|(p, q)| *p * Decimal::from(*q))
                .sum();
            assert_eq!(totals.subtotal, subtotal);
            assert_eq!(totals.subtotal + totals.gst, totals.total);
            assert!(totals.gst.scale() <= 2);
        }
    }

    #[test]
    fn test_gst_rounds_midpoint_away_from_zero() {
        // 0.10 * 0.05 = 0.005 -> 0.01
        let totals = compute_totals([(dec("0.10"), 1)]);
        assert_eq!(totals.gst, dec("0.01"));
        assert_eq!(totals.total, dec("0.11"));

        // 2.50 * 0.05 = 0.125 -> 0.13
        let totals = compute_totals([(dec("2.50"), 1)]);
        assert_eq!(totals.gst, dec("0.13"));
    }

    #[test]
    fn test_totals_empty_is_zero() {
        let totals = compute_totals(std::iter::empty());
        assert_eq!(totals.subtotal, Decimal::ZERO);
        assert_eq!(totals.gst, Decimal::ZERO);
        assert_eq!(totals.total, Decimal::ZERO);
    }

    #[test]
    fn test_identifier_formats() {
        for _ in 0..500 {
            let (order_number, token_number) = draw_order_identifiers();

            let digits = order_number.strip_prefix("MFP").unwrap();
            let n: u32 = digits.parse().unwrap();
            assert!((10..=99).contains(&n), "order number out of range: {n}");

            let digits = token_number.strip_prefix('#').unwrap();
            let n: u32 = digits.parse().unwrap();
            assert!((100..=999).contains(&n), "token number out of range: {n}");
        }
    }

    #[test]
    fn test_gst_rate_is_five_percent() {
        assert_eq!(gst_rate(), dec("0.05"));
    }
}
