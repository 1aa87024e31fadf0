use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::discounts::{
        CreateDiscountRequest, DiscountList, DiscountSummary, UpdateDiscountRequest,
        ValidateDiscountRequest, ValidateDiscountResponse,
    },
    entity::{
        discount_menu_items::{
            ActiveModel as DiscountItemActive, Column as DiscountItemCol,
            Entity as DiscountMenuItems,
        },
        discounts::{ActiveModel, Column, Entity as Discounts, Model as DiscountModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_owner},
    models::Discount,
    response::{ApiResponse, Meta},
    routes::params::CanteenScope,
    state::AppState,
};

pub const DISCOUNT_KINDS: [&str; 2] = ["percentage", "fixed"];

/// Compute the discount amount for an order value, or reject the code.
/// Pure function of the discount record, the order value, and the clock.
pub fn evaluate(discount: &DiscountModel, order_value: i64, now: DateTime<Utc>) -> AppResult<i64> {
    if !discount.is_active {
        return Err(AppError::BadRequest("Discount code is not active".into()));
    }

    let start = discount.start_date.with_timezone(&Utc);
    let end = discount.end_date.with_timezone(&Utc);
    if now < start || now > end {
        return Err(AppError::BadRequest(
            "Discount code has expired or is not yet active".into(),
        ));
    }

    if let Some(limit) = discount.usage_limit {
        if discount.usage_count >= limit {
            return Err(AppError::BadRequest("Discount usage limit reached".into()));
        }
    }

    if order_value < discount.min_order_value {
        return Err(AppError::BadRequest(format!(
            "Minimum order value of {} required",
            discount.min_order_value
        )));
    }

    let amount = match discount.kind.as_str() {
        "percentage" => {
            let raw = order_value * discount.value / 100;
            match discount.max_discount_amount {
                Some(cap) => raw.min(cap),
                None => raw,
            }
        }
        _ => discount.value,
    };

    Ok(amount)
}

fn validate_kind(kind: &str) -> Result<(), AppError> {
    if DISCOUNT_KINDS.contains(&kind) {
        Ok(())
    } else {
        Err(AppError::BadRequest(
            "Discount kind must be percentage or fixed".into(),
        ))
    }
}

fn validate_window(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), AppError> {
    if end <= start {
        return Err(AppError::BadRequest(
            "End date must be after start date".into(),
        ));
    }
    Ok(())
}

pub async fn list_discounts(
    state: &AppState,
    query: CanteenScope,
) -> AppResult<ApiResponse<DiscountList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let finder = Discounts::find()
        .filter(Column::CanteenId.eq(query.canteen_id))
        .order_by_desc(Column::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let models = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let mut items = Vec::with_capacity(models.len());
    for model in models {
        let item_ids = applicable_item_ids(&state.orm, model.id).await?;
        items.push(Discount::from_entity(model, item_ids));
    }

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Discounts",
        DiscountList { items },
        Some(meta),
    ))
}

pub async fn get_discount(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Discount>> {
    let discount = Discounts::find_by_id(id).one(&state.orm).await?;
    let discount = match discount {
        Some(d) => d,
        None => return Err(AppError::NotFound),
    };

    let item_ids = applicable_item_ids(&state.orm, discount.id).await?;
    Ok(ApiResponse::success(
        "Discount",
        Discount::from_entity(discount, item_ids),
        None,
    ))
}

pub async fn create_discount(
    state: &AppState,
    user: &AuthUser,
    payload: CreateDiscountRequest,
) -> AppResult<ApiResponse<Discount>> {
    ensure_owner(user)?;
    validate_kind(&payload.kind)?;
    validate_window(payload.start_date, payload.end_date)?;
    if payload.value < 0 {
        return Err(AppError::BadRequest(
            "Discount value must not be negative".into(),
        ));
    }

    let code = payload.code.trim().to_uppercase();
    if code.is_empty() {
        return Err(AppError::BadRequest("Discount code is required".into()));
    }

    let existing = Discounts::find()
        .filter(Column::Code.eq(code.as_str()))
        .one(&state.orm)
        .await?;
    if existing.is_some() {
        return Err(AppError::BadRequest("Discount code already exists".into()));
    }

    let txn = state.orm.begin().await?;

    let discount = ActiveModel {
        id: Set(Uuid::new_v4()),
        canteen_id: Set(payload.canteen_id),
        name: Set(payload.name),
        code: Set(code),
        description: Set(payload.description),
        kind: Set(payload.kind),
        value: Set(payload.value),
        min_order_value: Set(payload.min_order_value.unwrap_or(0)),
        max_discount_amount: Set(payload.max_discount_amount),
        start_date: Set(payload.start_date.into()),
        end_date: Set(payload.end_date.into()),
        is_active: Set(true),
        usage_limit: Set(payload.usage_limit),
        usage_count: Set(0),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let item_ids = payload.applicable_item_ids.unwrap_or_default();
    for menu_item_id in &item_ids {
        DiscountItemActive {
            id: Set(Uuid::new_v4()),
            discount_id: Set(discount.id),
            menu_item_id: Set(*menu_item_id),
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "discount_create",
        Some("discounts"),
        Some(serde_json::json!({ "discount_id": discount.id, "code": discount.code })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Discount created",
        Discount::from_entity(discount, item_ids),
        Some(Meta::empty()),
    ))
}

pub async fn update_discount(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateDiscountRequest,
) -> AppResult<ApiResponse<Discount>> {
    ensure_owner(user)?;
    let existing = Discounts::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(d) => d,
        None => return Err(AppError::NotFound),
    };

    if let Some(kind) = payload.kind.as_deref() {
        validate_kind(kind)?;
    }

    // The validity window invariant holds for the record as it will be stored.
    let start = payload
        .start_date
        .unwrap_or_else(|| existing.start_date.with_timezone(&Utc));
    let end = payload
        .end_date
        .unwrap_or_else(|| existing.end_date.with_timezone(&Utc));
    validate_window(start, end)?;

    let txn = state.orm.begin().await?;

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(kind) = payload.kind {
        active.kind = Set(kind);
    }
    if let Some(value) = payload.value {
        if value < 0 {
            return Err(AppError::BadRequest(
                "Discount value must not be negative".into(),
            ));
        }
        active.value = Set(value);
    }
    if let Some(min_order_value) = payload.min_order_value {
        active.min_order_value = Set(min_order_value);
    }
    if let Some(max_discount_amount) = payload.max_discount_amount {
        active.max_discount_amount = Set(Some(max_discount_amount));
    }
    active.start_date = Set(start.into());
    active.end_date = Set(end.into());
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    if let Some(usage_limit) = payload.usage_limit {
        active.usage_limit = Set(Some(usage_limit));
    }
    active.updated_at = Set(Utc::now().into());
    let discount = active.update(&txn).await?;

    let item_ids = match payload.applicable_item_ids {
        Some(ids) => {
            DiscountMenuItems::delete_many()
                .filter(DiscountItemCol::DiscountId.eq(discount.id))
                .exec(&txn)
                .await?;
            for menu_item_id in &ids {
                DiscountItemActive {
                    id: Set(Uuid::new_v4()),
                    discount_id: Set(discount.id),
                    menu_item_id: Set(*menu_item_id),
                }
                .insert(&txn)
                .await?;
            }
            ids
        }
        None => applicable_item_ids(&txn, discount.id).await?,
    };

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "discount_update",
        Some("discounts"),
        Some(serde_json::json!({ "discount_id": discount.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Discount updated",
        Discount::from_entity(discount, item_ids),
        Some(Meta::empty()),
    ))
}

pub async fn delete_discount(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_owner(user)?;
    let result = Discounts::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "discount_delete",
        Some("discounts"),
        Some(serde_json::json!({ "discount_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Discount deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn validate_discount(
    state: &AppState,
    payload: ValidateDiscountRequest,
) -> AppResult<ApiResponse<ValidateDiscountResponse>> {
    let discount = find_active_code(&state.orm, &payload.code, payload.canteen_id).await?;
    let discount = match discount {
        Some(d) => d,
        None => return Err(AppError::NotFound),
    };

    let amount = evaluate(&discount, payload.order_value, Utc::now())?;

    let resp = ValidateDiscountResponse {
        valid: true,
        discount_amount: amount,
        discount: DiscountSummary {
            id: discount.id,
            code: discount.code,
            name: discount.name,
        },
    };
    Ok(ApiResponse::success("Discount is valid", resp, None))
}

/// Lookup used by both the validate endpoint and order creation.
pub async fn find_active_code<C: ConnectionTrait>(
    conn: &C,
    code: &str,
    canteen_id: Uuid,
) -> AppResult<Option<DiscountModel>> {
    let discount = Discounts::find()
        .filter(
            Condition::all()
                .add(Column::Code.eq(code.trim().to_uppercase()))
                .add(Column::CanteenId.eq(canteen_id))
                .add(Column::IsActive.eq(true)),
        )
        .one(conn)
        .await?;
    Ok(discount)
}

async fn applicable_item_ids<C: ConnectionTrait>(
    conn: &C,
    discount_id: Uuid,
) -> AppResult<Vec<Uuid>> {
    let ids = DiscountMenuItems::find()
        .filter(DiscountItemCol::DiscountId.eq(discount_id))
        .all(conn)
        .await?
        .into_iter()
        .map(|link| link.menu_item_id)
        .collect();
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_discount(kind: &str, value: i64) -> DiscountModel {
        let now = Utc::now();
        DiscountModel {
            id: Uuid::new_v4(),
            canteen_id: Uuid::new_v4(),
            name: "Test offer".into(),
            code: "TEST10".into(),
            description: None,
            kind: kind.into(),
            value,
            min_order_value: 0,
            max_discount_amount: None,
            start_date: (now - Duration::days(1)).into(),
            end_date: (now + Duration::days(1)).into(),
            is_active: true,
            usage_limit: None,
            usage_count: 0,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[test]
    fn percentage_amount_is_capped() {
        let mut discount = sample_discount("percentage", 10);
        discount.max_discount_amount = Some(50);
        let amount = evaluate(&discount, 600, Utc::now()).expect("valid discount");
        assert_eq!(amount, 50);
    }

    #[test]
    fn percentage_amount_below_cap() {
        let mut discount = sample_discount("percentage", 10);
        discount.max_discount_amount = Some(50);
        let amount = evaluate(&discount, 400, Utc::now()).expect("valid discount");
        assert_eq!(amount, 40);
    }

    #[test]
    fn percentage_without_cap() {
        let discount = sample_discount("percentage", 25);
        let amount = evaluate(&discount, 1000, Utc::now()).expect("valid discount");
        assert_eq!(amount, 250);
    }

    #[test]
    fn fixed_amount_ignores_order_value() {
        let discount = sample_discount("fixed", 30);
        assert_eq!(evaluate(&discount, 100, Utc::now()).unwrap(), 30);
        assert_eq!(evaluate(&discount, 10_000, Utc::now()).unwrap(), 30);
    }

    #[test]
    fn inactive_discount_is_rejected() {
        let mut discount = sample_discount("fixed", 30);
        discount.is_active = false;
        assert!(evaluate(&discount, 100, Utc::now()).is_err());
    }

    #[test]
    fn expired_discount_is_rejected() {
        let mut discount = sample_discount("fixed", 30);
        let now = Utc::now();
        discount.start_date = (now - Duration::days(10)).into();
        discount.end_date = (now - Duration::days(5)).into();
        assert!(evaluate(&discount, 100, now).is_err());
    }

    #[test]
    fn not_yet_active_discount_is_rejected() {
        let mut discount = sample_discount("fixed", 30);
        let now = Utc::now();
        discount.start_date = (now + Duration::days(1)).into();
        discount.end_date = (now + Duration::days(5)).into();
        assert!(evaluate(&discount, 100, now).is_err());
    }

    #[test]
    fn usage_limit_is_enforced() {
        let mut discount = sample_discount("fixed", 30);
        discount.usage_limit = Some(5);
        discount.usage_count = 5;
        assert!(evaluate(&discount, 100, Utc::now()).is_err());

        discount.usage_count = 4;
        assert!(evaluate(&discount, 100, Utc::now()).is_ok());
    }

    #[test]
    fn minimum_order_value_is_enforced() {
        let mut discount = sample_discount("percentage", 10);
        discount.min_order_value = 200;
        assert!(evaluate(&discount, 199, Utc::now()).is_err());
        assert_eq!(evaluate(&discount, 200, Utc::now()).unwrap(), 20);
    }

    #[test]
    fn window_validation_rejects_inverted_dates() {
        let now = Utc::now();
        assert!(validate_window(now, now).is_err());
        assert!(validate_window(now, now - Duration::hours(1)).is_err());
        assert!(validate_window(now, now + Duration::hours(1)).is_ok());
    }
}
