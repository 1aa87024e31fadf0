use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::menu::{CreateMenuItemRequest, MenuItemList, UpdateMenuItemRequest},
    entity::menu_items::{ActiveModel, Column, Entity as MenuItems},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::MenuItem,
    response::{ApiResponse, Meta},
    routes::params::{MenuQuery, PopularItemsQuery},
    state::AppState,
};

pub const MENU_DAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

pub const MENU_CATEGORIES: [&str; 6] = [
    "breakfast",
    "lunch",
    "dinner",
    "snacks",
    "beverages",
    "desserts",
];

fn validate_day(day: &str) -> Result<(), AppError> {
    if MENU_DAYS.contains(&day) {
        Ok(())
    } else {
        Err(AppError::BadRequest("Invalid menu day".into()))
    }
}

fn validate_category(category: &str) -> Result<(), AppError> {
    if MENU_CATEGORIES.contains(&category) {
        Ok(())
    } else {
        Err(AppError::BadRequest("Invalid menu category".into()))
    }
}

pub async fn list_menu_items(
    state: &AppState,
    query: MenuQuery,
) -> AppResult<ApiResponse<MenuItemList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all();
    if let Some(canteen_id) = query.canteen_id {
        condition = condition.add(Column::CanteenId.eq(canteen_id));
    }
    if let Some(day) = query.day.as_ref().filter(|d| !d.is_empty()) {
        condition = condition.add(Column::Day.eq(day.clone()));
    }
    if let Some(category) = query.category.as_ref().filter(|c| !c.is_empty()) {
        condition = condition.add(Column::Category.eq(category.clone()));
    }
    if let Some(is_available) = query.is_available {
        condition = condition.add(Column::IsAvailable.eq(is_available));
    }

    let finder = MenuItems::find()
        .filter(condition)
        .order_by_asc(Column::Category)
        .order_by_asc(Column::Name);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(MenuItem::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Menu items",
        MenuItemList { items },
        Some(meta),
    ))
}

pub async fn get_menu_item(state: &AppState, id: Uuid) -> AppResult<ApiResponse<MenuItem>> {
    let item = MenuItems::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(MenuItem::from);
    let item = match item {
        Some(i) => i,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("Menu item", item, None))
}

pub async fn create_menu_item(
    state: &AppState,
    user: &AuthUser,
    payload: CreateMenuItemRequest,
) -> AppResult<ApiResponse<MenuItem>> {
    validate_day(&payload.day)?;
    validate_category(&payload.category)?;
    if payload.price < 0 {
        return Err(AppError::BadRequest("Price must not be negative".into()));
    }

    let item = ActiveModel {
        id: Set(Uuid::new_v4()),
        canteen_id: Set(payload.canteen_id),
        name: Set(payload.name),
        description: Set(payload.description),
        day: Set(payload.day),
        category: Set(payload.category),
        price: Set(payload.price),
        preparation_time: Set(payload.preparation_time),
        is_available: Set(payload.is_available.unwrap_or(true)),
        is_vegetarian: Set(payload.is_vegetarian.unwrap_or(false)),
        popularity_score: Set(0),
        image_url: Set(payload.image_url),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "menu_item_create",
        Some("menu_items"),
        Some(serde_json::json!({ "menu_item_id": item.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Menu item created",
        MenuItem::from(item),
        Some(Meta::empty()),
    ))
}

pub async fn update_menu_item(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateMenuItemRequest,
) -> AppResult<ApiResponse<MenuItem>> {
    let existing = MenuItems::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(i) => i,
        None => return Err(AppError::NotFound),
    };

    if let Some(day) = payload.day.as_deref() {
        validate_day(day)?;
    }
    if let Some(category) = payload.category.as_deref() {
        validate_category(category)?;
    }
    if let Some(price) = payload.price {
        if price < 0 {
            return Err(AppError::BadRequest("Price must not be negative".into()));
        }
    }

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(day) = payload.day {
        active.day = Set(day);
    }
    if let Some(category) = payload.category {
        active.category = Set(category);
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    if let Some(preparation_time) = payload.preparation_time {
        active.preparation_time = Set(Some(preparation_time));
    }
    if let Some(is_available) = payload.is_available {
        active.is_available = Set(is_available);
    }
    if let Some(is_vegetarian) = payload.is_vegetarian {
        active.is_vegetarian = Set(is_vegetarian);
    }
    if let Some(image_url) = payload.image_url {
        active.image_url = Set(Some(image_url));
    }
    active.updated_at = Set(Utc::now().into());
    let item = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "menu_item_update",
        Some("menu_items"),
        Some(serde_json::json!({ "menu_item_id": item.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Menu item updated",
        MenuItem::from(item),
        Some(Meta::empty()),
    ))
}

pub async fn delete_menu_item(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = MenuItems::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "menu_item_delete",
        Some("menu_items"),
        Some(serde_json::json!({ "menu_item_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Menu item deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn toggle_availability(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<MenuItem>> {
    let existing = MenuItems::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(i) => i,
        None => return Err(AppError::NotFound),
    };

    let enabled = !existing.is_available;
    let mut active: ActiveModel = existing.into();
    active.is_available = Set(enabled);
    active.updated_at = Set(Utc::now().into());
    let item = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "menu_item_toggle",
        Some("menu_items"),
        Some(serde_json::json!({ "menu_item_id": item.id, "is_available": enabled })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let message = if enabled {
        "Menu item enabled"
    } else {
        "Menu item disabled"
    };
    Ok(ApiResponse::success(
        message,
        MenuItem::from(item),
        Some(Meta::empty()),
    ))
}

pub async fn list_popular_items(
    state: &AppState,
    query: PopularItemsQuery,
) -> AppResult<ApiResponse<MenuItemList>> {
    let limit = query.limit.unwrap_or(10).min(50);
    let items = MenuItems::find()
        .filter(Column::CanteenId.eq(query.canteen_id))
        .order_by_desc(Column::PopularityScore)
        .limit(limit)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(MenuItem::from)
        .collect();

    Ok(ApiResponse::success(
        "Popular menu items",
        MenuItemList { items },
        None,
    ))
}
