use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::discounts::{
        CreateDiscountRequest, DiscountList, UpdateDiscountRequest, ValidateDiscountRequest,
        ValidateDiscountResponse,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::Discount,
    response::ApiResponse,
    routes::params::CanteenScope,
    services::discount_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_discounts))
        .route("/", post(create_discount))
        .route("/validate", post(validate_discount))
        .route("/{id}", get(get_discount))
        .route("/{id}", put(update_discount))
        .route("/{id}", delete(delete_discount))
}

#[utoipa::path(
    get,
    path = "/api/v1/discounts",
    params(
        ("canteen_id" = Uuid, Query, description = "Canteen ID"),
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    responses(
        (status = 200, description = "List discounts", body = ApiResponse<DiscountList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Discounts"
)]
pub async fn list_discounts(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<CanteenScope>,
) -> AppResult<Json<ApiResponse<DiscountList>>> {
    let resp = discount_service::list_discounts(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/v1/discounts/{id}",
    params(
        ("id" = Uuid, Path, description = "Discount ID")
    ),
    responses(
        (status = 200, description = "Get discount", body = ApiResponse<Discount>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Discounts"
)]
pub async fn get_discount(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Discount>>> {
    let resp = discount_service::get_discount(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/v1/discounts",
    request_body = CreateDiscountRequest,
    responses(
        (status = 200, description = "Create discount", body = ApiResponse<Discount>),
        (status = 400, description = "Invalid kind, window, or duplicate code"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Discounts"
)]
pub async fn create_discount(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateDiscountRequest>,
) -> AppResult<Json<ApiResponse<Discount>>> {
    let resp = discount_service::create_discount(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/v1/discounts/{id}",
    params(
        ("id" = Uuid, Path, description = "Discount ID")
    ),
    request_body = UpdateDiscountRequest,
    responses(
        (status = 200, description = "Updated discount", body = ApiResponse<Discount>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Discounts"
)]
pub async fn update_discount(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDiscountRequest>,
) -> AppResult<Json<ApiResponse<Discount>>> {
    let resp = discount_service::update_discount(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/v1/discounts/{id}",
    params(
        ("id" = Uuid, Path, description = "Discount ID")
    ),
    responses(
        (status = 200, description = "Deleted discount"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Discounts"
)]
pub async fn delete_discount(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = discount_service::delete_discount(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/v1/discounts/validate",
    request_body = ValidateDiscountRequest,
    responses(
        (status = 200, description = "Discount applies; amount included", body = ApiResponse<ValidateDiscountResponse>),
        (status = 400, description = "Discount does not apply"),
        (status = 404, description = "Unknown code"),
    ),
    security(("bearer_auth" = [])),
    tag = "Discounts"
)]
pub async fn validate_discount(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(payload): Json<ValidateDiscountRequest>,
) -> AppResult<Json<ApiResponse<ValidateDiscountResponse>>> {
    let resp = discount_service::validate_discount(&state, payload).await?;
    Ok(Json(resp))
}
