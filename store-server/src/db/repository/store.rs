//! Partner Store Repository
//!
//! Stores are the pickup locations a grocery run is assembled from. Each
//! carries its own delivery fee; the run is charged the highest fee among
//! its stores.

use super::{RepoError, RepoResult};
use shared::models::{Store, StoreCreate, StoreUpdate};
use sqlx::SqlitePool;

/// Storefront listing: active stores only
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Store>> {
    let stores = sqlx::query_as::<_, Store>(
        "SELECT id, name, address, delivery_fee_cents, image_url, is_active, created_at, updated_at FROM stores WHERE is_active = 1 ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(stores)
}

/// Back office listing: every store including deactivated ones
pub async fn find_all_admin(pool: &SqlitePool) -> RepoResult<Vec<Store>> {
    let stores = sqlx::query_as::<_, Store>(
        "SELECT id, name, address, delivery_fee_cents, image_url, is_active, created_at, updated_at FROM stores ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(stores)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Store>> {
    let store = sqlx::query_as::<_, Store>(
        "SELECT id, name, address, delivery_fee_cents, image_url, is_active, created_at, updated_at FROM stores WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(store)
}

pub async fn find_by_name(pool: &SqlitePool, name: &str) -> RepoResult<Option<Store>> {
    let store = sqlx::query_as::<_, Store>(
        "SELECT id, name, address, delivery_fee_cents, image_url, is_active, created_at, updated_at FROM stores WHERE name = ?",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;
    Ok(store)
}

pub async fn create(pool: &SqlitePool, data: StoreCreate) -> RepoResult<Store> {
    if find_by_name(pool, &data.name).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "Store '{}' already exists",
            data.name
        )));
    }
    if data.delivery_fee_cents < 0 {
        return Err(RepoError::Validation(
            "Delivery fee must not be negative".into(),
        ));
    }

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO stores (id, name, address, delivery_fee_cents, image_url, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?6)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.address)
    .bind(data.delivery_fee_cents)
    .bind(&data.image_url)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create store".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: StoreUpdate) -> RepoResult<Store> {
    if let Some(name) = &data.name
        && let Some(existing) = find_by_name(pool, name).await?
        && existing.id != id
    {
        return Err(RepoError::Duplicate(format!("Store '{name}' already exists")));
    }
    if let Some(fee) = data.delivery_fee_cents
        && fee < 0
    {
        return Err(RepoError::Validation(
            "Delivery fee must not be negative".into(),
        ));
    }

    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE stores SET name = COALESCE(?1, name), address = COALESCE(?2, address), delivery_fee_cents = COALESCE(?3, delivery_fee_cents), image_url = COALESCE(?4, image_url), is_active = COALESCE(?5, is_active), updated_at = ?6 WHERE id = ?7",
    )
    .bind(&data.name)
    .bind(&data.address)
    .bind(data.delivery_fee_cents)
    .bind(&data.image_url)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Store {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Store {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    // Grocery runs keep a snapshot of the store name, but the entry row still
    // points back here. Refuse to delete a store with history.
    let refs = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM pickup_order_stores WHERE store_id = ?",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;
    if refs > 0 {
        return Err(RepoError::Validation(
            "Cannot delete store with orders".into(),
        ));
    }

    let rows = sqlx::query("DELETE FROM stores WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Store {id} not found")));
    }
    Ok(true)
}
