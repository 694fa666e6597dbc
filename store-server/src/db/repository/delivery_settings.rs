//! Delivery Settings Repository
//!
//! Singleton row, created on first read. 单例配置，首次访问时自动创建。

use super::{RepoError, RepoResult};
use shared::models::{DeliverySettings, DeliverySettingsUpdate, DELIVERY_SETTINGS_ID};
use sqlx::SqlitePool;

pub async fn get_or_create(pool: &SqlitePool) -> RepoResult<DeliverySettings> {
    get_or_create_with_zone(pool, "Australia/Adelaide").await
}

/// First boot seeds the given zone; later calls return the stored row
/// untouched.
pub async fn get_or_create_with_zone(
    pool: &SqlitePool,
    timezone: &str,
) -> RepoResult<DeliverySettings> {
    if let Some(settings) = find(pool).await? {
        return Ok(settings);
    }

    let now = shared::util::now_millis();
    // INSERT OR IGNORE: a concurrent first read must not fail on the
    // primary key
    sqlx::query(
        "INSERT OR IGNORE INTO delivery_settings (id, express_fee_cents, scheduled_fee_cents, late_fee_cents, convenience_fee_cents, timezone, estimated_delivery_minutes, updated_at) VALUES (?1, 0, 0, 0, 0, ?2, 60, ?3)",
    )
    .bind(DELIVERY_SETTINGS_ID)
    .bind(timezone)
    .bind(now)
    .execute(pool)
    .await?;

    find(pool)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create delivery settings".into()))
}

async fn find(pool: &SqlitePool) -> RepoResult<Option<DeliverySettings>> {
    let settings = sqlx::query_as::<_, DeliverySettings>(
        "SELECT id, express_fee_cents, scheduled_fee_cents, late_fee_cents, convenience_fee_cents, timezone, estimated_delivery_minutes, updated_at FROM delivery_settings WHERE id = ?",
    )
    .bind(DELIVERY_SETTINGS_ID)
    .fetch_optional(pool)
    .await?;
    Ok(settings)
}

pub async fn update(
    pool: &SqlitePool,
    data: DeliverySettingsUpdate,
) -> RepoResult<DeliverySettings> {
    for fee in [
        data.express_fee_cents,
        data.scheduled_fee_cents,
        data.late_fee_cents,
        data.convenience_fee_cents,
    ]
    .into_iter()
    .flatten()
    {
        if fee < 0 {
            return Err(RepoError::Validation("Fees must not be negative".into()));
        }
    }
    if let Some(tz) = &data.timezone
        && tz.parse::<chrono_tz::Tz>().is_err()
    {
        return Err(RepoError::Validation(format!("Unknown timezone '{tz}'")));
    }
    if let Some(minutes) = data.estimated_delivery_minutes
        && minutes <= 0
    {
        return Err(RepoError::Validation(
            "Estimated delivery minutes must be positive".into(),
        ));
    }

    // Ensure the row exists before the partial update
    get_or_create(pool).await?;

    let now = shared::util::now_millis();
    sqlx::query(
        "UPDATE delivery_settings SET express_fee_cents = COALESCE(?1, express_fee_cents), scheduled_fee_cents = COALESCE(?2, scheduled_fee_cents), late_fee_cents = COALESCE(?3, late_fee_cents), convenience_fee_cents = COALESCE(?4, convenience_fee_cents), timezone = COALESCE(?5, timezone), estimated_delivery_minutes = COALESCE(?6, estimated_delivery_minutes), updated_at = ?7 WHERE id = ?8",
    )
    .bind(data.express_fee_cents)
    .bind(data.scheduled_fee_cents)
    .bind(data.late_fee_cents)
    .bind(data.convenience_fee_cents)
    .bind(&data.timezone)
    .bind(data.estimated_delivery_minutes)
    .bind(now)
    .bind(DELIVERY_SETTINGS_ID)
    .execute(pool)
    .await?;

    find(pool)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to update delivery settings".into()))
}
