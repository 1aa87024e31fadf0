use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Discount;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateDiscountRequest {
    pub canteen_id: Uuid,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub kind: String,
    pub value: i64,
    pub min_order_value: Option<i64>,
    pub max_discount_amount: Option<i64>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub usage_limit: Option<i32>,
    pub applicable_item_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateDiscountRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub kind: Option<String>,
    pub value: Option<i64>,
    pub min_order_value: Option<i64>,
    pub max_discount_amount: Option<i64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
    pub usage_limit: Option<i32>,
    pub applicable_item_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ValidateDiscountRequest {
    pub code: String,
    pub order_value: i64,
    pub canteen_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DiscountSummary {
    pub id: Uuid,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ValidateDiscountResponse {
    pub valid: bool,
    pub discount_amount: i64,
    pub discount: DiscountSummary,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DiscountList {
    pub items: Vec<Discount>,
}
