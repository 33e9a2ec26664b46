//! Session lookups against the identity provider's tables

use sqlx::PgPool;

/// User identity resolved from a session token
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SessionUser {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub expires_at: i64,
}

/// Resolve a session token to its user, if the session exists
pub async fn find_user_by_token(
    pool: &PgPool,
    token: &str,
) -> Result<Option<SessionUser>, sqlx::Error> {
    sqlx::query_as(
        "SELECT s.user_id, u.name, u.email, s.expires_at
         FROM sessions s
         JOIN users u ON u.id = s.user_id
         WHERE s.token = $1",
    )
    .bind(token)
    .fetch_optional(pool)
    .await
}
