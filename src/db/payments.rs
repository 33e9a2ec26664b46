//! Payment confirmation workflow
//!
//! Payment creation and the order status advance are one transaction;
//! the UNIQUE constraint on payments.order_id makes concurrent attempts
//! resolve to exactly one winner.

use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use super::orders::{self, Order};

use rust_decimal::Decimal;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub order_id: Uuid,
    pub amount: Decimal,
    pub method: String,
    pub status: String,
    pub payment_date: i64,
}

pub mod status {
    pub const COMPLETED: &str = "completed";
    pub const NOT_INITIATED: &str = "not_initiated";
}

/// Outcome of a payment attempt against an existing order
#[derive(Debug)]
pub enum PaymentOutcome {
    /// Payment recorded; the order moved to `confirmed`
    Created(Payment),
    /// A payment already existed; nothing changed
    Duplicate(Payment),
}

/// Record a payment for the user's order and advance its status.
///
/// Returns None when the order is absent or owned by another user. The order
/// row is locked for the duration so a concurrent attempt observes either
/// nothing or both effects.
pub async fn create(
    pool: &PgPool,
    user_id: &str,
    order_id: Uuid,
    method: &str,
    now: i64,
) -> Result<Option<PaymentOutcome>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let order: Option<Order> =
        sqlx::query_as("SELECT * FROM orders WHERE id = $1 AND user_id = $2 FOR UPDATE")
            .bind(order_id)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;

    let Some(order) = order else {
        return Ok(None);
    };

    let created: Option<Payment> = sqlx::query_as(
        "INSERT INTO payments (order_id, amount, method, status, payment_date)
         VALUES ($1, $2, $3, $4, $5)
         ON CONFLICT (order_id) DO NOTHING
         RETURNING *",
    )
    .bind(order_id)
    .bind(order.total)
    .bind(method)
    .bind(status::COMPLETED)
    .bind(now)
    .fetch_optional(&mut *tx)
    .await?;

    match created {
        Some(payment) => {
            sqlx::query("UPDATE orders SET status = $1 WHERE id = $2")
                .bind(orders::status::CONFIRMED)
                .bind(order_id)
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;

            tracing::info!(
                payment_id = %payment.id,
                %order_id,
                amount = %payment.amount,
                method = %payment.method,
                "Payment recorded"
            );
            Ok(Some(PaymentOutcome::Created(payment)))
        }
        None => {
            let existing: Payment = sqlx::query_as("SELECT * FROM payments WHERE order_id = $1")
                .bind(order_id)
                .fetch_one(&mut *tx)
                .await?;
            tx.commit().await?;
            Ok(Some(PaymentOutcome::Duplicate(existing)))
        }
    }
}

/// Payment (if any) for the user's order; None when the order itself is
/// absent or foreign
pub async fn find_for_order(
    pool: &PgPool,
    user_id: &str,
    order_id: Uuid,
) -> Result<Option<(Order, Option<Payment>)>, sqlx::Error> {
    let Some(order) = orders::find_by_id(pool, user_id, order_id).await? else {
        return Ok(None);
    };

    let payment: Option<Payment> = sqlx::query_as("SELECT * FROM payments WHERE order_id = $1")
        .bind(order_id)
        .fetch_optional(pool)
        .await?;

    Ok(Some((order, payment)))
}
