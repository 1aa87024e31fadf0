use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::InventoryItem;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateInventoryItemRequest {
    pub canteen_id: Uuid,
    pub supplier_id: Option<Uuid>,
    pub name: String,
    pub category: String,
    pub unit: String,
    pub current_stock: i32,
    pub min_stock_level: i32,
    pub max_stock_level: i32,
    pub reorder_point: i32,
    pub unit_price: i64,
    pub expiry_date: Option<DateTime<Utc>>,
    pub storage_location: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateInventoryItemRequest {
    pub supplier_id: Option<Uuid>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub min_stock_level: Option<i32>,
    pub max_stock_level: Option<i32>,
    pub reorder_point: Option<i32>,
    pub unit_price: Option<i64>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub storage_location: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StockOperation {
    Add,
    Subtract,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StockAdjustRequest {
    pub operation: StockOperation,
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InventoryList {
    pub items: Vec<InventoryItem>,
}
