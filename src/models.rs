use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity;

/// Public user record; the password hash never leaves the service layer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<entity::users::Model> for User {
    fn from(model: entity::users::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            role: model.role,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Canteen {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub created_at: DateTime<Utc>,
}

impl From<entity::canteens::Model> for Canteen {
    fn from(model: entity::canteens::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            location: model.location,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MenuItem {
    pub id: Uuid,
    pub canteen_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub day: String,
    pub category: String,
    pub price: i64,
    pub preparation_time: Option<i32>,
    pub is_available: bool,
    pub is_vegetarian: bool,
    pub popularity_score: i32,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<entity::menu_items::Model> for MenuItem {
    fn from(model: entity::menu_items::Model) -> Self {
        Self {
            id: model.id,
            canteen_id: model.canteen_id,
            name: model.name,
            description: model.description,
            day: model.day,
            category: model.category,
            price: model.price,
            preparation_time: model.preparation_time,
            is_available: model.is_available,
            is_vegetarian: model.is_vegetarian,
            popularity_score: model.popularity_score,
            image_url: model.image_url,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InventoryItem {
    pub id: Uuid,
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
    pub last_restocked: Option<DateTime<Utc>>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub storage_location: Option<String>,
    /// Stock at or below the reorder point.
    pub is_low_stock: bool,
    /// Stock at or below the minimum stock level.
    pub is_critical_stock: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<entity::inventory_items::Model> for InventoryItem {
    fn from(model: entity::inventory_items::Model) -> Self {
        Self {
            id: model.id,
            canteen_id: model.canteen_id,
            supplier_id: model.supplier_id,
            is_low_stock: model.current_stock <= model.reorder_point,
            is_critical_stock: model.current_stock <= model.min_stock_level,
            name: model.name,
            category: model.category,
            unit: model.unit,
            current_stock: model.current_stock,
            min_stock_level: model.min_stock_level,
            max_stock_level: model.max_stock_level,
            reorder_point: model.reorder_point,
            unit_price: model.unit_price,
            last_restocked: model.last_restocked.map(|dt| dt.with_timezone(&Utc)),
            expiry_date: model.expiry_date.map(|dt| dt.with_timezone(&Utc)),
            storage_location: model.storage_location,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Supplier {
    pub id: Uuid,
    pub canteen_id: Uuid,
    pub name: String,
    pub contact_person: String,
    pub email: String,
    pub phone: String,
    pub address_street: String,
    pub address_city: String,
    pub address_state: String,
    pub address_pincode: String,
    pub gst_number: Option<String>,
    pub rating: i32,
    pub is_active: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<entity::suppliers::Model> for Supplier {
    fn from(model: entity::suppliers::Model) -> Self {
        Self {
            id: model.id,
            canteen_id: model.canteen_id,
            name: model.name,
            contact_person: model.contact_person,
            email: model.email,
            phone: model.phone,
            address_street: model.address_street,
            address_city: model.address_city,
            address_state: model.address_state,
            address_pincode: model.address_pincode,
            gst_number: model.gst_number,
            rating: model.rating,
            is_active: model.is_active,
            notes: model.notes,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Discount {
    pub id: Uuid,
    pub canteen_id: Uuid,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub kind: String,
    pub value: i64,
    pub min_order_value: i64,
    pub max_discount_amount: Option<i64>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_active: bool,
    pub usage_limit: Option<i32>,
    pub usage_count: i32,
    pub applicable_item_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Discount {
    pub fn from_entity(model: entity::discounts::Model, applicable_item_ids: Vec<Uuid>) -> Self {
        Self {
            id: model.id,
            canteen_id: model.canteen_id,
            name: model.name,
            code: model.code,
            description: model.description,
            kind: model.kind,
            value: model.value,
            min_order_value: model.min_order_value,
            max_discount_amount: model.max_discount_amount,
            start_date: model.start_date.with_timezone(&Utc),
            end_date: model.end_date.with_timezone(&Utc),
            is_active: model.is_active,
            usage_limit: model.usage_limit,
            usage_count: model.usage_count,
            applicable_item_ids,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub canteen_id: Uuid,
    pub order_number: String,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub order_type: String,
    pub table_number: Option<String>,
    pub subtotal: i64,
    pub tax: i64,
    pub discount_id: Option<Uuid>,
    pub discount_amount: i64,
    pub total_amount: i64,
    pub payment_method: String,
    pub payment_status: String,
    pub status: String,
    pub estimated_preparation_time: Option<i32>,
    pub actual_preparation_time: Option<i32>,
    pub notes: Option<String>,
    pub processed_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<entity::orders::Model> for Order {
    fn from(model: entity::orders::Model) -> Self {
        Self {
            id: model.id,
            canteen_id: model.canteen_id,
            order_number: model.order_number,
            customer_name: model.customer_name,
            customer_phone: model.customer_phone,
            order_type: model.order_type,
            table_number: model.table_number,
            subtotal: model.subtotal,
            tax: model.tax,
            discount_id: model.discount_id,
            discount_amount: model.discount_amount,
            total_amount: model.total_amount,
            payment_method: model.payment_method,
            payment_status: model.payment_status,
            status: model.status,
            estimated_preparation_time: model.estimated_preparation_time,
            actual_preparation_time: model.actual_preparation_time,
            notes: model.notes,
            processed_by: model.processed_by,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub menu_item_id: Uuid,
    pub item_name: String,
    pub quantity: i32,
    pub price: i64,
    pub line_total: i64,
    pub special_instructions: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<entity::order_items::Model> for OrderItem {
    fn from(model: entity::order_items::Model) -> Self {
        Self {
            id: model.id,
            order_id: model.order_id,
            menu_item_id: model.menu_item_id,
            item_name: model.item_name,
            quantity: model.quantity,
            price: model.price,
            line_total: model.line_total,
            special_instructions: model.special_instructions,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
