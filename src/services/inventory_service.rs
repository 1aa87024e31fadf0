use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::inventory::{
        CreateInventoryItemRequest, InventoryList, StockAdjustRequest, StockOperation,
        UpdateInventoryItemRequest,
    },
    entity::inventory_items::{ActiveModel, Column, Entity as InventoryItems},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::InventoryItem,
    response::{ApiResponse, Meta},
    routes::params::CanteenScope,
    state::AppState,
};

pub const STOCK_UNITS: [&str; 8] = ["kg", "g", "l", "ml", "pcs", "dozen", "box", "packet"];

fn validate_unit(unit: &str) -> Result<(), AppError> {
    if STOCK_UNITS.contains(&unit) {
        Ok(())
    } else {
        Err(AppError::BadRequest("Invalid stock unit".into()))
    }
}

/// Plain stock arithmetic: `add` always succeeds, `subtract` fails when the
/// request exceeds what is on hand. Returns the new level and whether the
/// restock timestamp should move.
pub fn apply_stock_adjustment(
    current_stock: i32,
    operation: &StockOperation,
    quantity: i32,
) -> Result<(i32, bool), AppError> {
    if quantity <= 0 {
        return Err(AppError::BadRequest("Quantity must be positive".into()));
    }
    match operation {
        StockOperation::Add => Ok((current_stock + quantity, true)),
        StockOperation::Subtract => {
            if current_stock < quantity {
                Err(AppError::BadRequest("Insufficient stock".into()))
            } else {
                Ok((current_stock - quantity, false))
            }
        }
    }
}

pub async fn list_inventory(
    state: &AppState,
    query: CanteenScope,
) -> AppResult<ApiResponse<InventoryList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let finder = InventoryItems::find()
        .filter(Column::CanteenId.eq(query.canteen_id))
        .order_by_asc(Column::Name);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(InventoryItem::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Inventory",
        InventoryList { items },
        Some(meta),
    ))
}

pub async fn list_low_stock(
    state: &AppState,
    query: CanteenScope,
) -> AppResult<ApiResponse<InventoryList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let finder = InventoryItems::find()
        .filter(
            Condition::all()
                .add(Column::CanteenId.eq(query.canteen_id))
                .add(Expr::col(Column::CurrentStock).lte(Expr::col(Column::ReorderPoint))),
        )
        .order_by_asc(Column::CurrentStock);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(InventoryItem::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Low stock items",
        InventoryList { items },
        Some(meta),
    ))
}

pub async fn get_inventory_item(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<InventoryItem>> {
    let item = InventoryItems::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(InventoryItem::from);
    let item = match item {
        Some(i) => i,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("Inventory item", item, None))
}

pub async fn create_inventory_item(
    state: &AppState,
    user: &AuthUser,
    payload: CreateInventoryItemRequest,
) -> AppResult<ApiResponse<InventoryItem>> {
    validate_unit(&payload.unit)?;
    if payload.current_stock < 0 || payload.unit_price < 0 {
        return Err(AppError::BadRequest(
            "Stock and unit price must not be negative".into(),
        ));
    }

    let item = ActiveModel {
        id: Set(Uuid::new_v4()),
        canteen_id: Set(payload.canteen_id),
        supplier_id: Set(payload.supplier_id),
        name: Set(payload.name),
        category: Set(payload.category),
        unit: Set(payload.unit),
        current_stock: Set(payload.current_stock),
        min_stock_level: Set(payload.min_stock_level),
        max_stock_level: Set(payload.max_stock_level),
        reorder_point: Set(payload.reorder_point),
        unit_price: Set(payload.unit_price),
        last_restocked: Set(None),
        expiry_date: Set(payload.expiry_date.map(Into::into)),
        storage_location: Set(payload.storage_location),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "inventory_create",
        Some("inventory_items"),
        Some(serde_json::json!({ "inventory_item_id": item.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Inventory item created",
        InventoryItem::from(item),
        Some(Meta::empty()),
    ))
}

pub async fn update_inventory_item(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateInventoryItemRequest,
) -> AppResult<ApiResponse<InventoryItem>> {
    let existing = InventoryItems::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(i) => i,
        None => return Err(AppError::NotFound),
    };

    if let Some(unit) = payload.unit.as_deref() {
        validate_unit(unit)?;
    }

    let mut active: ActiveModel = existing.into();
    if let Some(supplier_id) = payload.supplier_id {
        active.supplier_id = Set(Some(supplier_id));
    }
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(category) = payload.category {
        active.category = Set(category);
    }
    if let Some(unit) = payload.unit {
        active.unit = Set(unit);
    }
    if let Some(min_stock_level) = payload.min_stock_level {
        active.min_stock_level = Set(min_stock_level);
    }
    if let Some(max_stock_level) = payload.max_stock_level {
        active.max_stock_level = Set(max_stock_level);
    }
    if let Some(reorder_point) = payload.reorder_point {
        active.reorder_point = Set(reorder_point);
    }
    if let Some(unit_price) = payload.unit_price {
        if unit_price < 0 {
            return Err(AppError::BadRequest(
                "Unit price must not be negative".into(),
            ));
        }
        active.unit_price = Set(unit_price);
    }
    if let Some(expiry_date) = payload.expiry_date {
        active.expiry_date = Set(Some(expiry_date.into()));
    }
    if let Some(storage_location) = payload.storage_location {
        active.storage_location = Set(Some(storage_location));
    }
    active.updated_at = Set(Utc::now().into());
    let item = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "inventory_update",
        Some("inventory_items"),
        Some(serde_json::json!({ "inventory_item_id": item.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Inventory item updated",
        InventoryItem::from(item),
        Some(Meta::empty()),
    ))
}

pub async fn delete_inventory_item(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = InventoryItems::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "inventory_delete",
        Some("inventory_items"),
        Some(serde_json::json!({ "inventory_item_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Inventory item deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

/// Row-locked read-modify-write so two concurrent adjustments cannot both
/// read the same stock level.
pub async fn adjust_stock(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: StockAdjustRequest,
) -> AppResult<ApiResponse<InventoryItem>> {
    let txn = state.orm.begin().await?;
    let item = InventoryItems::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let item = match item {
        Some(i) => i,
        None => return Err(AppError::NotFound),
    };

    let (new_stock, restocked) =
        apply_stock_adjustment(item.current_stock, &payload.operation, payload.quantity)?;

    let mut active: ActiveModel = item.into();
    active.current_stock = Set(new_stock);
    if restocked {
        active.last_restocked = Set(Some(Utc::now().into()));
    }
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&txn).await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "inventory_stock_adjust",
        Some("inventory_items"),
        Some(serde_json::json!({
            "inventory_item_id": updated.id,
            "quantity": payload.quantity,
        })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Stock updated",
        InventoryItem::from(updated),
        Some(Meta::empty()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_increases_stock_and_marks_restock() {
        let (stock, restocked) =
            apply_stock_adjustment(5, &StockOperation::Add, 7).expect("add succeeds");
        assert_eq!(stock, 12);
        assert!(restocked);
    }

    #[test]
    fn subtract_within_stock() {
        let (stock, restocked) =
            apply_stock_adjustment(10, &StockOperation::Subtract, 4).expect("subtract succeeds");
        assert_eq!(stock, 6);
        assert!(!restocked);
    }

    #[test]
    fn subtract_beyond_stock_is_rejected() {
        let err = apply_stock_adjustment(5, &StockOperation::Subtract, 7).unwrap_err();
        match err {
            AppError::BadRequest(msg) => assert_eq!(msg, "Insufficient stock"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn subtract_entire_stock_is_allowed() {
        let (stock, _) =
            apply_stock_adjustment(5, &StockOperation::Subtract, 5).expect("subtract to zero");
        assert_eq!(stock, 0);
    }

    #[test]
    fn zero_or_negative_quantity_is_rejected() {
        assert!(apply_stock_adjustment(5, &StockOperation::Add, 0).is_err());
        assert!(apply_stock_adjustment(5, &StockOperation::Subtract, -2).is_err());
    }
}
