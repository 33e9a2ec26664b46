//! Database access layer
//!
//! Free async functions over `&PgPool` (or a transaction), one module per
//! table group. Multi-write workflows (order placement, payment confirmation)
//! run inside a single transaction.

pub mod cart;
pub mod favorites;
pub mod orders;
pub mod payments;
pub mod products;
pub mod sessions;

/// True when the error is a Postgres unique-constraint violation
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
