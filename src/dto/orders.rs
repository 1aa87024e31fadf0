use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Order, OrderItem};

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderLineRequest {
    pub menu_item_id: Uuid,
    pub quantity: i32,
    pub special_instructions: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub canteen_id: Uuid,
    pub items: Vec<OrderLineRequest>,
    pub order_type: String,
    pub payment_method: String,
    pub tax: Option<i64>,
    pub discount_code: Option<String>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub table_number: Option<String>,
    pub notes: Option<String>,
    pub estimated_preparation_time: Option<i32>,
}

/// Contact and payment-state fields only; totals are always recomputed
/// server-side and never accepted from the client.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderRequest {
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub table_number: Option<String>,
    pub notes: Option<String>,
    pub estimated_preparation_time: Option<i32>,
    pub payment_status: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderStatistics {
    pub total_orders: i64,
    pub total_revenue: i64,
    pub average_order_value: i64,
    pub orders_by_status: HashMap<String, i64>,
    pub orders_by_type: HashMap<String, i64>,
    pub orders_by_payment_method: HashMap<String, i64>,
}
