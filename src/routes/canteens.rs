use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::canteens::{AddStaffRequest, CanteenDetail, CanteenList, RegisterCanteenRequest, UpdateCanteenRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Canteen,
    response::ApiResponse,
    services::canteen_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(register_canteen))
        .route("/user/{user_id}", get(list_canteens))
        .route("/{id}", get(get_canteen))
        .route("/{id}", put(update_canteen))
        .route("/{id}/staff", post(add_staff))
        .route("/{id}/staff/{staff_id}", delete(remove_staff))
}

#[utoipa::path(
    post,
    path = "/api/v1/canteens",
    request_body = RegisterCanteenRequest,
    responses(
        (status = 200, description = "Register a canteen", body = ApiResponse<Canteen>),
        (status = 400, description = "Invalid payload or duplicate name"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Canteens"
)]
pub async fn register_canteen(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<RegisterCanteenRequest>,
) -> AppResult<Json<ApiResponse<Canteen>>> {
    let resp = canteen_service::register_canteen(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/v1/canteens/user/{user_id}",
    params(
        ("user_id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Canteens the user belongs to", body = ApiResponse<CanteenList>),
        (status = 404, description = "Unknown user"),
    ),
    security(("bearer_auth" = [])),
    tag = "Canteens"
)]
pub async fn list_canteens(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CanteenList>>> {
    let resp = canteen_service::list_canteens_for_user(&state, user_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/v1/canteens/{id}",
    params(
        ("id" = Uuid, Path, description = "Canteen ID")
    ),
    responses(
        (status = 200, description = "Canteen with members", body = ApiResponse<CanteenDetail>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Canteens"
)]
pub async fn get_canteen(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CanteenDetail>>> {
    let resp = canteen_service::get_canteen(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/v1/canteens/{id}",
    params(
        ("id" = Uuid, Path, description = "Canteen ID")
    ),
    request_body = UpdateCanteenRequest,
    responses(
        (status = 200, description = "Updated canteen", body = ApiResponse<CanteenDetail>),
        (status = 400, description = "Duplicate name"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Canteens"
)]
pub async fn update_canteen(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCanteenRequest>,
) -> AppResult<Json<ApiResponse<CanteenDetail>>> {
    let resp = canteen_service::update_canteen(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/v1/canteens/{id}/staff",
    params(
        ("id" = Uuid, Path, description = "Canteen ID")
    ),
    request_body = AddStaffRequest,
    responses(
        (status = 200, description = "Staff added", body = ApiResponse<CanteenDetail>),
        (status = 400, description = "Unknown staff ids"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Canteens"
)]
pub async fn add_staff(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddStaffRequest>,
) -> AppResult<Json<ApiResponse<CanteenDetail>>> {
    let resp = canteen_service::add_staff(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/v1/canteens/{id}/staff/{staff_id}",
    params(
        ("id" = Uuid, Path, description = "Canteen ID"),
        ("staff_id" = Uuid, Path, description = "User ID of the staff member"),
    ),
    responses(
        (status = 200, description = "Staff removed", body = ApiResponse<CanteenDetail>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Canteens"
)]
pub async fn remove_staff(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, staff_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<CanteenDetail>>> {
    let resp = canteen_service::remove_staff(&state, &user, id, staff_id).await?;
    Ok(Json(resp))
}
