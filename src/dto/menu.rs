use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::MenuItem;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMenuItemRequest {
    pub canteen_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub day: String,
    pub category: String,
    pub price: i64,
    pub preparation_time: Option<i32>,
    pub is_available: Option<bool>,
    pub is_vegetarian: Option<bool>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateMenuItemRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub day: Option<String>,
    pub category: Option<String>,
    pub price: Option<i64>,
    pub preparation_time: Option<i32>,
    pub is_available: Option<bool>,
    pub is_vegetarian: Option<bool>,
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MenuItemList {
    pub items: Vec<MenuItem>,
}
