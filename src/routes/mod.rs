use axum::Router;

use crate::state::AppState;

pub mod auth;
pub mod canteens;
pub mod discounts;
pub mod doc;
pub mod health;
pub mod inventory;
pub mod menu;
pub mod orders;
pub mod params;
pub mod suppliers;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/canteens", canteens::router())
        .nest("/menu", menu::router())
        .nest("/inventory", inventory::router())
        .nest("/suppliers", suppliers::router())
        .nest("/discounts", discounts::router())
        .nest("/orders", orders::router())
}
