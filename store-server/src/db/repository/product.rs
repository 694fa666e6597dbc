//! Product Repository

use super::{RepoError, RepoResult};
use shared::models::{Product, ProductCreate, ProductUpdate};
use sqlx::SqlitePool;

/// Storefront listing: in-stock products, optionally filtered by category
pub async fn find_all(pool: &SqlitePool, category_id: Option<i64>) -> RepoResult<Vec<Product>> {
    let products = match category_id {
        Some(cat) => {
            sqlx::query_as::<_, Product>(
                "SELECT id, name, description, price_cents, image_url, category_id, in_stock, sort_order, created_at, updated_at FROM products WHERE in_stock = 1 AND category_id = ? ORDER BY sort_order, name",
            )
            .bind(cat)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Product>(
                "SELECT id, name, description, price_cents, image_url, category_id, in_stock, sort_order, created_at, updated_at FROM products WHERE in_stock = 1 ORDER BY sort_order, name",
            )
            .fetch_all(pool)
            .await?
        }
    };
    Ok(products)
}

/// Back office listing: every product including out-of-stock ones
pub async fn find_all_admin(pool: &SqlitePool) -> RepoResult<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(
        "SELECT id, name, description, price_cents, image_url, category_id, in_stock, sort_order, created_at, updated_at FROM products ORDER BY sort_order, name",
    )
    .fetch_all(pool)
    .await?;
    Ok(products)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(
        "SELECT id, name, description, price_cents, image_url, category_id, in_stock, sort_order, created_at, updated_at FROM products WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(product)
}

pub async fn create(pool: &SqlitePool, data: ProductCreate) -> RepoResult<Product> {
    if data.price_cents < 0 {
        return Err(RepoError::Validation("Price must not be negative".into()));
    }
    // Category must exist when given
    if let Some(cat) = data.category_id
        && super::category::find_by_id(pool, cat).await?.is_none()
    {
        return Err(RepoError::NotFound(format!("Category {cat} not found")));
    }

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO products (id, name, description, price_cents, image_url, category_id, in_stock, sort_order, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.price_cents)
    .bind(&data.image_url)
    .bind(data.category_id)
    .bind(data.in_stock.unwrap_or(true))
    .bind(data.sort_order.unwrap_or(0))
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: ProductUpdate) -> RepoResult<Product> {
    if let Some(price) = data.price_cents
        && price < 0
    {
        return Err(RepoError::Validation("Price must not be negative".into()));
    }
    if let Some(cat) = data.category_id
        && super::category::find_by_id(pool, cat).await?.is_none()
    {
        return Err(RepoError::NotFound(format!("Category {cat} not found")));
    }

    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE products SET name = COALESCE(?1, name), description = COALESCE(?2, description), price_cents = COALESCE(?3, price_cents), image_url = COALESCE(?4, image_url), category_id = COALESCE(?5, category_id), in_stock = COALESCE(?6, in_stock), sort_order = COALESCE(?7, sort_order), updated_at = ?8 WHERE id = ?9",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.price_cents)
    .bind(&data.image_url)
    .bind(data.category_id)
    .bind(data.in_stock)
    .bind(data.sort_order)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM products WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    Ok(true)
}
