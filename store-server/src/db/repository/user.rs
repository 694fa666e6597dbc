//! User Repository
//!
//! Back-office accounts with argon2 password hashing.

use super::{RepoError, RepoResult};
use shared::models::{User, UserCreate, UserUpdate};
use sqlx::SqlitePool;

/// Hash password using argon2
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    use argon2::{
        Argon2,
        password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
    };

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(password_hash.to_string())
}

/// Verify password using argon2
pub fn verify_password(hash: &str, password: &str) -> Result<bool, argon2::password_hash::Error> {
    use argon2::{
        Argon2,
        password_hash::{PasswordHash, PasswordVerifier},
    };

    let parsed_hash = PasswordHash::new(hash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<User>> {
    let users = sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash, display_name, is_admin, is_active, created_at, updated_at FROM users ORDER BY username",
    )
    .fetch_all(pool)
    .await?;
    Ok(users)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash, display_name, is_admin, is_active, created_at, updated_at FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash, display_name, is_admin, is_active, created_at, updated_at FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn create(pool: &SqlitePool, data: UserCreate) -> RepoResult<User> {
    let username = data.username.trim();
    if username.is_empty() {
        return Err(RepoError::Validation("Username must not be empty".into()));
    }
    if data.password.len() < 8 {
        return Err(RepoError::Validation(
            "Password must be at least 8 characters".into(),
        ));
    }
    if find_by_username(pool, username).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "User '{username}' already exists"
        )));
    }

    let password_hash =
        hash_password(&data.password).map_err(|e| RepoError::Database(e.to_string()))?;
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO users (id, username, password_hash, display_name, is_admin, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?6)",
    )
    .bind(id)
    .bind(username)
    .bind(&password_hash)
    .bind(&data.display_name)
    .bind(data.is_admin)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: UserUpdate) -> RepoResult<User> {
    if let Some(password) = &data.password
        && password.len() < 8
    {
        return Err(RepoError::Validation(
            "Password must be at least 8 characters".into(),
        ));
    }
    let password_hash = match &data.password {
        Some(password) => {
            Some(hash_password(password).map_err(|e| RepoError::Database(e.to_string()))?)
        }
        None => None,
    };

    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE users SET display_name = COALESCE(?1, display_name), password_hash = COALESCE(?2, password_hash), is_admin = COALESCE(?3, is_admin), is_active = COALESCE(?4, is_active), updated_at = ?5 WHERE id = ?6",
    )
    .bind(&data.display_name)
    .bind(&password_hash)
    .bind(data.is_admin)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("User {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }
    Ok(true)
}

/// Seed the admin account on first boot. Existing accounts are left alone.
pub async fn ensure_admin(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> RepoResult<()> {
    if find_by_username(pool, username).await?.is_some() {
        return Ok(());
    }

    let password_hash =
        hash_password(password).map_err(|e| RepoError::Database(e.to_string()))?;
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO users (id, username, password_hash, display_name, is_admin, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, 'Administrator', 1, 1, ?4, ?4)",
    )
    .bind(id)
    .bind(username)
    .bind(&password_hash)
    .bind(now)
    .execute(pool)
    .await?;
    tracing::info!(username = %username, "Created default admin account");
    Ok(())
}
