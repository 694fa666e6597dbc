//! Order Bill Repository
//!
//! Bill line items are stored denormalized as a JSON column; they are a
//! snapshot of the receipt, never queried individually.

use super::{RepoError, RepoResult};
use shared::models::{OrderBill, OrderBillCreate, OrderKind};
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

fn bill_from_row(row: &SqliteRow) -> RepoResult<OrderBill> {
    let kind: String = row.try_get("order_kind")?;
    let order_kind = match kind.as_str() {
        "delivery" => OrderKind::Delivery,
        "pickup" => OrderKind::Pickup,
        other => {
            return Err(RepoError::Database(format!(
                "Unknown order kind '{other}' on bill row"
            )));
        }
    };
    let items_json: String = row.try_get("items_json")?;
    let items = serde_json::from_str(&items_json)
        .map_err(|e| RepoError::Database(format!("Corrupt bill items: {e}")))?;

    Ok(OrderBill {
        id: row.try_get("id")?,
        order_kind,
        order_id: row.try_get("order_id")?,
        items,
        total_cents: row.try_get("total_cents")?,
        image_url: row.try_get("image_url")?,
        created_at: row.try_get("created_at")?,
    })
}

pub async fn list_for(
    pool: &SqlitePool,
    order_kind: OrderKind,
    order_id: i64,
) -> RepoResult<Vec<OrderBill>> {
    let rows = sqlx::query(
        "SELECT id, order_kind, order_id, items_json, total_cents, image_url, created_at FROM order_bills WHERE order_kind = ?1 AND order_id = ?2 ORDER BY created_at, id",
    )
    .bind(order_kind.as_str())
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    rows.iter().map(bill_from_row).collect()
}

pub async fn create(
    pool: &SqlitePool,
    order_kind: OrderKind,
    order_id: i64,
    data: &OrderBillCreate,
) -> RepoResult<OrderBill> {
    if data.total_cents < 0 {
        return Err(RepoError::Validation(
            "Bill total must not be negative".into(),
        ));
    }
    for item in &data.items {
        if item.quantity <= 0 {
            return Err(RepoError::Validation(
                "Bill item quantity must be positive".into(),
            ));
        }
    }
    let items_json = serde_json::to_string(&data.items)
        .map_err(|e| RepoError::Database(format!("Failed to encode bill items: {e}")))?;

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO order_bills (id, order_kind, order_id, items_json, total_cents, image_url, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(id)
    .bind(order_kind.as_str())
    .bind(order_id)
    .bind(&items_json)
    .bind(data.total_cents)
    .bind(&data.image_url)
    .bind(now)
    .execute(pool)
    .await?;

    let row = sqlx::query(
        "SELECT id, order_kind, order_id, items_json, total_cents, image_url, created_at FROM order_bills WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    match row {
        Some(row) => bill_from_row(&row),
        None => Err(RepoError::Database("Failed to create order bill".into())),
    }
}
