use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, patch, post, put},
};
use uuid::Uuid;

use crate::{
    dto::inventory::{
        CreateInventoryItemRequest, InventoryList, StockAdjustRequest, UpdateInventoryItemRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::InventoryItem,
    response::ApiResponse,
    routes::params::CanteenScope,
    services::inventory_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_inventory))
        .route("/", post(create_inventory_item))
        .route("/low-stock", get(list_low_stock))
        .route("/{id}", get(get_inventory_item))
        .route("/{id}", put(update_inventory_item))
        .route("/{id}", delete(delete_inventory_item))
        .route("/{id}/stock", patch(adjust_stock))
}

#[utoipa::path(
    get,
    path = "/api/v1/inventory",
    params(
        ("canteen_id" = Uuid, Query, description = "Canteen ID"),
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    responses(
        (status = 200, description = "List inventory", body = ApiResponse<InventoryList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Inventory"
)]
pub async fn list_inventory(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<CanteenScope>,
) -> AppResult<Json<ApiResponse<InventoryList>>> {
    let resp = inventory_service::list_inventory(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/v1/inventory/low-stock",
    params(
        ("canteen_id" = Uuid, Query, description = "Canteen ID"),
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    responses(
        (status = 200, description = "Items at or below their reorder point", body = ApiResponse<InventoryList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Inventory"
)]
pub async fn list_low_stock(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<CanteenScope>,
) -> AppResult<Json<ApiResponse<InventoryList>>> {
    let resp = inventory_service::list_low_stock(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/v1/inventory/{id}",
    params(
        ("id" = Uuid, Path, description = "Inventory item ID")
    ),
    responses(
        (status = 200, description = "Get inventory item", body = ApiResponse<InventoryItem>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Inventory"
)]
pub async fn get_inventory_item(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<InventoryItem>>> {
    let resp = inventory_service::get_inventory_item(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/v1/inventory",
    request_body = CreateInventoryItemRequest,
    responses(
        (status = 200, description = "Create inventory item", body = ApiResponse<InventoryItem>),
        (status = 400, description = "Invalid unit or negative values"),
    ),
    security(("bearer_auth" = [])),
    tag = "Inventory"
)]
pub async fn create_inventory_item(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateInventoryItemRequest>,
) -> AppResult<Json<ApiResponse<InventoryItem>>> {
    let resp = inventory_service::create_inventory_item(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/v1/inventory/{id}",
    params(
        ("id" = Uuid, Path, description = "Inventory item ID")
    ),
    request_body = UpdateInventoryItemRequest,
    responses(
        (status = 200, description = "Updated inventory item", body = ApiResponse<InventoryItem>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Inventory"
)]
pub async fn update_inventory_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateInventoryItemRequest>,
) -> AppResult<Json<ApiResponse<InventoryItem>>> {
    let resp = inventory_service::update_inventory_item(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/v1/inventory/{id}",
    params(
        ("id" = Uuid, Path, description = "Inventory item ID")
    ),
    responses(
        (status = 200, description = "Deleted inventory item"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Inventory"
)]
pub async fn delete_inventory_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = inventory_service::delete_inventory_item(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/v1/inventory/{id}/stock",
    params(
        ("id" = Uuid, Path, description = "Inventory item ID")
    ),
    request_body = StockAdjustRequest,
    responses(
        (status = 200, description = "Stock adjusted", body = ApiResponse<InventoryItem>),
        (status = 400, description = "Insufficient stock or invalid quantity"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Inventory"
)]
pub async fn adjust_stock(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<StockAdjustRequest>,
) -> AppResult<Json<ApiResponse<InventoryItem>>> {
    let resp = inventory_service::adjust_stock(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
