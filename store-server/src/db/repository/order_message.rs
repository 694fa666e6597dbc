//! Order Message Repository
//!
//! Chat thread attached to an order, keyed by (kind, order id) since
//! delivery orders and grocery runs live in separate tables.

use super::{RepoError, RepoResult};
use shared::models::{MessageSender, OrderKind, OrderMessage};
use sqlx::SqlitePool;

pub async fn list_for(
    pool: &SqlitePool,
    order_kind: OrderKind,
    order_id: i64,
) -> RepoResult<Vec<OrderMessage>> {
    let messages = sqlx::query_as::<_, OrderMessage>(
        "SELECT id, order_kind, order_id, sender, message, created_at FROM order_messages WHERE order_kind = ?1 AND order_id = ?2 ORDER BY created_at, id",
    )
    .bind(order_kind.as_str())
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(messages)
}

pub async fn create(
    pool: &SqlitePool,
    order_kind: OrderKind,
    order_id: i64,
    sender: MessageSender,
    message: &str,
) -> RepoResult<OrderMessage> {
    let text = message.trim();
    if text.is_empty() {
        return Err(RepoError::Validation("Message must not be empty".into()));
    }

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO order_messages (id, order_kind, order_id, sender, message, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(id)
    .bind(order_kind.as_str())
    .bind(order_id)
    .bind(sender.as_str())
    .bind(text)
    .bind(now)
    .execute(pool)
    .await?;

    let created = sqlx::query_as::<_, OrderMessage>(
        "SELECT id, order_kind, order_id, sender, message, created_at FROM order_messages WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    created.ok_or_else(|| RepoError::Database("Failed to create order message".into()))
}
