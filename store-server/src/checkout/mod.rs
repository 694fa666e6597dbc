//! Checkout
//!
//! Turns a submitted cart into a priced, persisted order. Contact checks,
//! price snapshotting, promo application, slot booking and the final totals
//! all live here so the HTTP layer stays thin. Failures before the insert
//! leave no order behind; a slot booked along the way is released again if
//! a later step fails. Promo uses are consumed only by the atomic redeem
//! and are never handed back.

use std::collections::HashSet;

use sqlx::SqlitePool;

use crate::db::repository::order::{LineDraft, OrderDraft};
use crate::db::repository::pickup_order::{PickupOrderDraft, StoreEntryDraft};
use crate::db::repository::{delivery_settings, order, pickup_order, product, store};
use crate::pricing;
use crate::promo;
use crate::scheduling;
use crate::utils::validation::{self, MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_NOTE_LEN};
use crate::utils::{AppError, AppResult, ErrorCode, time};
use shared::models::{
    AppliedPromo, DeliveryType, Order, OrderCreate, OrderItemInput, PickupOrder, PickupOrderCreate,
    SlotType,
};

/// Contact fields shared by both order kinds
fn validate_contact(
    name: &str,
    email: &str,
    phone: &str,
    address: &str,
    notes: &Option<String>,
) -> AppResult<()> {
    validation::validate_required_text(name, "Customer name", MAX_NAME_LEN)?;
    validation::validate_email(email)?;
    validation::validate_phone(phone)?;
    validation::validate_required_text(address, "Delivery address", MAX_ADDRESS_LEN)?;
    validation::validate_optional_text(notes, "Notes", MAX_NOTE_LEN)?;
    Ok(())
}

/// Trimmed promo code input; empty strings count as absent
fn promo_input(code: &Option<String>) -> Option<&str> {
    code.as_deref().map(str::trim).filter(|c| !c.is_empty())
}

/// Resolve cart lines against the catalog.
///
/// Lines with a `product_id` snapshot the current catalog name and price;
/// the client-sent values are ignored for them. Free-form lines keep what
/// the client sent after validation.
async fn resolve_lines(pool: &SqlitePool, items: &[OrderItemInput]) -> AppResult<Vec<LineDraft>> {
    if items.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }
    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        if item.quantity <= 0 {
            return Err(AppError::validation("Quantity must be positive"));
        }
        let line = if let Some(product_id) = item.product_id {
            let found = product::find_by_id(pool, product_id).await?.ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::ProductNotFound,
                    format!("Product {product_id} not found"),
                )
            })?;
            LineDraft {
                name: found.name,
                price_cents: found.price_cents,
                quantity: item.quantity,
            }
        } else {
            validation::validate_required_text(&item.name, "Item name", MAX_NAME_LEN)?;
            if item.price_cents < 0 {
                return Err(AppError::validation("Item price must not be negative"));
            }
            LineDraft {
                name: item.name.trim().to_string(),
                price_cents: item.price_cents,
                quantity: item.quantity,
            }
        };
        lines.push(line);
    }
    Ok(lines)
}

/// Redeem the supplied promo, if any
async fn redeem_promo(
    pool: &SqlitePool,
    code: &Option<String>,
    subtotal_cents: i64,
) -> AppResult<Option<AppliedPromo>> {
    match promo_input(code) {
        Some(code) => Ok(Some(promo::redeem(pool, code, subtotal_cents).await?)),
        None => Ok(None),
    }
}

/// 预订成功后任一步骤失败都要把名额还回去。
///
/// Release failures are logged rather than masking the original error.
async fn release_on_failure(pool: &SqlitePool, slot_id: Option<i64>, err: AppError) -> AppError {
    if let Some(id) = slot_id {
        if let Err(release_err) = scheduling::release_slot(pool, id).await {
            tracing::warn!(
                slot_id = id,
                error = %release_err,
                "Failed to release slot after checkout failure"
            );
        }
    }
    err
}

/// Place a delivery order.
///
/// Scheduled deliveries must name a `delivery` slot, which is booked
/// atomically before the promo redeem and the insert. Express and late
/// orders go out as soon as possible; a slot id sent with them is ignored.
pub async fn place_order(pool: &SqlitePool, data: OrderCreate) -> AppResult<Order> {
    validate_contact(
        &data.customer_name,
        &data.customer_email,
        &data.customer_phone,
        &data.delivery_address,
        &data.notes,
    )?;

    let lines = resolve_lines(pool, &data.items).await?;
    let subtotal_cents: i64 = lines.iter().map(|l| l.price_cents * l.quantity).sum();

    let settings = delivery_settings::get_or_create(pool).await?;
    let tz = time::parse_zone(&settings.timezone)?;
    let delivery_fee_cents = pricing::delivery_fee_for(data.delivery_type, &settings);

    // Reject plainly invalid codes before the slot counter is touched
    if let Some(code) = promo_input(&data.promo_code) {
        promo::validate_code(pool, code, subtotal_cents).await?;
    }

    let booked_slot = match data.delivery_type {
        DeliveryType::Scheduled => {
            let slot_id = data
                .time_slot_id
                .ok_or_else(|| AppError::validation("Scheduled delivery requires a time slot"))?;
            scheduling::book_slot(pool, slot_id, SlotType::Delivery, tz).await?;
            Some(slot_id)
        }
        DeliveryType::Express | DeliveryType::Late => None,
    };

    let applied = match redeem_promo(pool, &data.promo_code, subtotal_cents).await {
        Ok(applied) => applied,
        Err(err) => return Err(release_on_failure(pool, booked_slot, err).await),
    };
    let discount_cents = applied.as_ref().map_or(0, |a| a.discount_amount_cents);
    let total_cents = pricing::order_total_cents(subtotal_cents, discount_cents, delivery_fee_cents);

    let draft = OrderDraft {
        customer_name: data.customer_name.trim().to_string(),
        customer_email: data.customer_email.trim().to_string(),
        customer_phone: data.customer_phone.trim().to_string(),
        delivery_address: data.delivery_address.trim().to_string(),
        delivery_type: data.delivery_type,
        time_slot_id: booked_slot,
        notes: data.notes,
        subtotal_cents,
        delivery_fee_cents,
        discount_cents,
        promo_code: applied.map(|a| a.code),
        total_cents,
        items: lines,
    };
    match order::create(pool, draft).await {
        Ok(created) => Ok(created),
        Err(err) => Err(release_on_failure(pool, booked_slot, err.into()).await),
    }
}

/// Place a multi-store grocery run.
///
/// Every store must exist, be active and appear at most once. The combined
/// estimate has to clear the rising minimum floor before any fee is
/// computed. The run pays the highest per-store delivery fee plus the
/// 12% service charge and the configured convenience fee.
pub async fn place_pickup_order(
    pool: &SqlitePool,
    data: PickupOrderCreate,
) -> AppResult<PickupOrder> {
    validate_contact(
        &data.customer_name,
        &data.customer_email,
        &data.customer_phone,
        &data.delivery_address,
        &data.notes,
    )?;

    if data.stores.is_empty() {
        return Err(AppError::new(ErrorCode::RunStoresEmpty));
    }

    let mut entries = Vec::with_capacity(data.stores.len());
    let mut fees = Vec::with_capacity(data.stores.len());
    let mut seen = HashSet::new();
    for input in &data.stores {
        if !seen.insert(input.store_id) {
            return Err(AppError::validation(format!(
                "Store {} is listed more than once",
                input.store_id
            )));
        }
        if input.estimated_total_cents <= 0 {
            return Err(AppError::validation(
                "Store estimated total must be positive",
            ));
        }
        validation::validate_optional_text(&input.notes, "Store notes", MAX_NOTE_LEN)?;

        let found = store::find_by_id(pool, input.store_id).await?.ok_or_else(|| {
            AppError::with_message(
                ErrorCode::StoreNotFound,
                format!("Store {} not found", input.store_id),
            )
        })?;
        if !found.is_active {
            return Err(AppError::with_message(
                ErrorCode::StoreInactive,
                format!("Store '{}' is not taking orders", found.name),
            ));
        }
        fees.push(found.delivery_fee_cents);
        entries.push(StoreEntryDraft {
            store_id: found.id,
            store_name: found.name,
            estimated_total_cents: input.estimated_total_cents,
            notes: input.notes.clone(),
        });
    }

    let estimated_total_cents: i64 = entries.iter().map(|e| e.estimated_total_cents).sum();
    let minimum = pricing::run_minimum_cents(entries.len());
    if estimated_total_cents < minimum {
        return Err(AppError::with_message(
            ErrorCode::RunMinimumNotMet,
            format!(
                "A {}-store run requires at least ${}.{:02} estimated",
                entries.len(),
                minimum / 100,
                minimum % 100
            ),
        )
        .with_detail("minimum_cents", minimum));
    }

    let settings = delivery_settings::get_or_create(pool).await?;
    let tz = time::parse_zone(&settings.timezone)?;
    let service_charge_cents = pricing::service_charge_cents(estimated_total_cents);
    let delivery_fee_cents = pricing::run_delivery_fee_cents(fees);
    let convenience_fee_cents = settings.convenience_fee_cents;

    if let Some(code) = promo_input(&data.promo_code) {
        promo::validate_code(pool, code, estimated_total_cents).await?;
    }

    let booked_slot = match data.time_slot_id {
        Some(slot_id) => {
            scheduling::book_slot(pool, slot_id, SlotType::Pickup, tz).await?;
            Some(slot_id)
        }
        None => None,
    };

    let applied = match redeem_promo(pool, &data.promo_code, estimated_total_cents).await {
        Ok(applied) => applied,
        Err(err) => return Err(release_on_failure(pool, booked_slot, err).await),
    };
    let discount_cents = applied.as_ref().map_or(0, |a| a.discount_amount_cents);
    let total_cents = pricing::run_total_cents(
        estimated_total_cents,
        service_charge_cents,
        delivery_fee_cents,
        convenience_fee_cents,
        discount_cents,
    );

    let draft = PickupOrderDraft {
        customer_name: data.customer_name.trim().to_string(),
        customer_email: data.customer_email.trim().to_string(),
        customer_phone: data.customer_phone.trim().to_string(),
        delivery_address: data.delivery_address.trim().to_string(),
        time_slot_id: booked_slot,
        notes: data.notes,
        estimated_total_cents,
        service_charge_cents,
        delivery_fee_cents,
        convenience_fee_cents,
        discount_cents,
        promo_code: applied.map(|a| a.code),
        total_cents,
        stores: entries,
    };
    match pickup_order::create(pool, draft).await {
        Ok(created) => Ok(created),
        Err(err) => Err(release_on_failure(pool, booked_slot, err.into()).await),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{promo_code, time_slot};
    use crate::db::test_pool;
    use shared::models::{
        DiscountType, OrderStatus, PaymentStatus, ProductCreate, PromoCodeCreate, StoreCreate,
        StoreEntryInput, StoreUpdate, TimeSlot, TimeSlotCreate,
    };

    async fn seed_product(pool: &SqlitePool, name: &str, price_cents: i64) -> shared::models::Product {
        product::create(
            pool,
            ProductCreate {
                name: name.to_string(),
                description: None,
                price_cents,
                image_url: None,
                category_id: None,
                in_stock: Some(true),
                sort_order: None,
            },
        )
        .await
        .unwrap()
    }

    async fn seed_store(pool: &SqlitePool, name: &str, fee_cents: i64) -> shared::models::Store {
        store::create(
            pool,
            StoreCreate {
                name: name.to_string(),
                address: "1 Market St".to_string(),
                delivery_fee_cents: fee_cents,
                image_url: None,
            },
        )
        .await
        .unwrap()
    }

    async fn seed_slot(pool: &SqlitePool, slot_type: SlotType) -> TimeSlot {
        time_slot::create(
            pool,
            TimeSlotCreate {
                slot_date: "2099-06-01".to_string(),
                start_time: "09:00".to_string(),
                end_time: "11:00".to_string(),
                slot_type,
                max_orders: 2,
            },
        )
        .await
        .unwrap()
    }

    fn order_request(delivery_type: DeliveryType, items: Vec<OrderItemInput>) -> OrderCreate {
        OrderCreate {
            customer_name: "Ada Shopper".to_string(),
            customer_email: "ada@example.com".to_string(),
            customer_phone: "0400 123 456".to_string(),
            delivery_address: "12 Rundle Mall, Adelaide".to_string(),
            delivery_type,
            time_slot_id: None,
            notes: None,
            items,
            promo_code: None,
        }
    }

    fn run_request(stores: Vec<StoreEntryInput>) -> PickupOrderCreate {
        PickupOrderCreate {
            customer_name: "Ada Shopper".to_string(),
            customer_email: "ada@example.com".to_string(),
            customer_phone: "0400 123 456".to_string(),
            delivery_address: "12 Rundle Mall, Adelaide".to_string(),
            time_slot_id: None,
            notes: None,
            stores,
            promo_code: None,
        }
    }

    fn catalog_line(product_id: i64, quantity: i64) -> OrderItemInput {
        OrderItemInput {
            product_id: Some(product_id),
            name: String::new(),
            price_cents: 0,
            quantity,
        }
    }

    #[tokio::test]
    async fn test_place_order_snapshots_catalog_prices() {
        let pool = test_pool().await;
        let milk = seed_product(&pool, "Milk 2L", 450).await;

        let mut request = order_request(DeliveryType::Express, vec![catalog_line(milk.id, 2)]);
        request.items.push(OrderItemInput {
            product_id: None,
            name: "Reusable bag".to_string(),
            price_cents: 100,
            quantity: 1,
        });

        let placed = place_order(&pool, request).await.unwrap();
        assert_eq!(placed.subtotal_cents, 1000);
        assert_eq!(placed.delivery_fee_cents, 0);
        assert_eq!(placed.total_cents, 1000);
        assert_eq!(placed.status, OrderStatus::Pending);
        assert_eq!(placed.payment_status, PaymentStatus::Pending);
        assert!(placed.time_slot_id.is_none());

        let items = order::items_for(&pool, placed.id).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Milk 2L");
        assert_eq!(items[0].price_cents, 450);
        assert_eq!(items[1].name, "Reusable bag");
    }

    #[tokio::test]
    async fn test_place_order_requires_items() {
        let pool = test_pool().await;
        let err = place_order(&pool, order_request(DeliveryType::Express, vec![]))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderEmpty);
    }

    #[tokio::test]
    async fn test_place_order_rejects_missing_product() {
        let pool = test_pool().await;
        let err = place_order(
            &pool,
            order_request(DeliveryType::Express, vec![catalog_line(42, 1)]),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductNotFound);
    }

    #[tokio::test]
    async fn test_scheduled_order_requires_slot() {
        let pool = test_pool().await;
        let milk = seed_product(&pool, "Milk 2L", 450).await;
        let err = place_order(
            &pool,
            order_request(DeliveryType::Scheduled, vec![catalog_line(milk.id, 1)]),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn test_scheduled_order_books_slot() {
        let pool = test_pool().await;
        let milk = seed_product(&pool, "Milk 2L", 450).await;
        let slot = seed_slot(&pool, SlotType::Delivery).await;

        let mut request = order_request(DeliveryType::Scheduled, vec![catalog_line(milk.id, 1)]);
        request.time_slot_id = Some(slot.id);

        let placed = place_order(&pool, request).await.unwrap();
        assert_eq!(placed.time_slot_id, Some(slot.id));

        let booked = time_slot::find_by_id(&pool, slot.id).await.unwrap().unwrap();
        assert_eq!(booked.current_orders, 1);
    }

    #[tokio::test]
    async fn test_scheduled_order_rejects_pickup_slot() {
        let pool = test_pool().await;
        let milk = seed_product(&pool, "Milk 2L", 450).await;
        let slot = seed_slot(&pool, SlotType::Pickup).await;

        let mut request = order_request(DeliveryType::Scheduled, vec![catalog_line(milk.id, 1)]);
        request.time_slot_id = Some(slot.id);

        let err = place_order(&pool, request).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::SlotWrongType);

        // The mismatch is caught before the counter moves
        let untouched = time_slot::find_by_id(&pool, slot.id).await.unwrap().unwrap();
        assert_eq!(untouched.current_orders, 0);
    }

    #[tokio::test]
    async fn test_order_promo_applied_and_consumed() {
        let pool = test_pool().await;
        let milk = seed_product(&pool, "Milk 2L", 500).await;
        let promo = promo_code::create(
            &pool,
            PromoCodeCreate {
                code: "SAVE10".to_string(),
                description: None,
                discount_type: DiscountType::Percentage,
                discount_value: 1000,
                minimum_order_cents: None,
                max_uses: Some(5),
                valid_from: 0,
                valid_until: None,
            },
        )
        .await
        .unwrap();

        let mut request = order_request(DeliveryType::Express, vec![catalog_line(milk.id, 2)]);
        request.promo_code = Some("save10".to_string());

        let placed = place_order(&pool, request).await.unwrap();
        assert_eq!(placed.subtotal_cents, 1000);
        assert_eq!(placed.discount_cents, 100);
        assert_eq!(placed.total_cents, 900);
        assert_eq!(placed.promo_code.as_deref(), Some("SAVE10"));

        let consumed = promo_code::find_by_id(&pool, promo.id).await.unwrap().unwrap();
        assert_eq!(consumed.current_uses, 1);
    }

    #[tokio::test]
    async fn test_place_pickup_order_two_stores() {
        let pool = test_pool().await;
        let fresh = seed_store(&pool, "Fresh Mart", 500).await;
        let corner = seed_store(&pool, "Corner Grocer", 800).await;

        let placed = place_pickup_order(
            &pool,
            run_request(vec![
                StoreEntryInput {
                    store_id: fresh.id,
                    estimated_total_cents: 6000,
                    notes: None,
                },
                StoreEntryInput {
                    store_id: corner.id,
                    estimated_total_cents: 4000,
                    notes: Some("Sourdough if they have it".to_string()),
                },
            ]),
        )
        .await
        .unwrap();

        assert_eq!(placed.estimated_total_cents, 10000);
        assert_eq!(placed.service_charge_cents, 1200);
        // Only the highest per-store fee is charged
        assert_eq!(placed.delivery_fee_cents, 800);
        assert_eq!(placed.convenience_fee_cents, 0);
        assert_eq!(placed.total_cents, 12000);

        let entries = pickup_order::stores_for(&pool, placed.id).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].store_name, "Fresh Mart");
        assert_eq!(entries[1].store_name, "Corner Grocer");
        assert!(entries[0].actual_total_cents.is_none());
    }

    #[tokio::test]
    async fn test_run_floor_rejected() {
        let pool = test_pool().await;
        let fresh = seed_store(&pool, "Fresh Mart", 500).await;
        let corner = seed_store(&pool, "Corner Grocer", 800).await;

        // Two stores need $75; $70 falls short
        let err = place_pickup_order(
            &pool,
            run_request(vec![
                StoreEntryInput {
                    store_id: fresh.id,
                    estimated_total_cents: 3000,
                    notes: None,
                },
                StoreEntryInput {
                    store_id: corner.id,
                    estimated_total_cents: 4000,
                    notes: None,
                },
            ]),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::RunMinimumNotMet);
    }

    #[tokio::test]
    async fn test_run_rejects_empty_stores() {
        let pool = test_pool().await;
        let err = place_pickup_order(&pool, run_request(vec![])).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RunStoresEmpty);
    }

    #[tokio::test]
    async fn test_run_rejects_inactive_store() {
        let pool = test_pool().await;
        let fresh = seed_store(&pool, "Fresh Mart", 500).await;
        store::update(
            &pool,
            fresh.id,
            StoreUpdate {
                name: None,
                address: None,
                delivery_fee_cents: None,
                image_url: None,
                is_active: Some(false),
            },
        )
        .await
        .unwrap();

        let err = place_pickup_order(
            &pool,
            run_request(vec![StoreEntryInput {
                store_id: fresh.id,
                estimated_total_cents: 6000,
                notes: None,
            }]),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::StoreInactive);
    }

    #[tokio::test]
    async fn test_run_rejects_duplicate_store() {
        let pool = test_pool().await;
        let fresh = seed_store(&pool, "Fresh Mart", 500).await;

        let err = place_pickup_order(
            &pool,
            run_request(vec![
                StoreEntryInput {
                    store_id: fresh.id,
                    estimated_total_cents: 4000,
                    notes: None,
                },
                StoreEntryInput {
                    store_id: fresh.id,
                    estimated_total_cents: 4000,
                    notes: None,
                },
            ]),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn test_pickup_run_books_pickup_slot() {
        let pool = test_pool().await;
        let fresh = seed_store(&pool, "Fresh Mart", 500).await;
        let slot = seed_slot(&pool, SlotType::Pickup).await;

        let mut request = run_request(vec![StoreEntryInput {
            store_id: fresh.id,
            estimated_total_cents: 6000,
            notes: None,
        }]);
        request.time_slot_id = Some(slot.id);

        let placed = place_pickup_order(&pool, request).await.unwrap();
        assert_eq!(placed.time_slot_id, Some(slot.id));

        let booked = time_slot::find_by_id(&pool, slot.id).await.unwrap().unwrap();
        assert_eq!(booked.current_orders, 1);
    }
}
