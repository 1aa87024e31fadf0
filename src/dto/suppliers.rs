use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Supplier;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSupplierRequest {
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
    pub rating: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateSupplierRequest {
    pub name: Option<String>,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address_street: Option<String>,
    pub address_city: Option<String>,
    pub address_state: Option<String>,
    pub address_pincode: Option<String>,
    pub gst_number: Option<String>,
    pub rating: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SupplierList {
    pub items: Vec<Supplier>,
}
