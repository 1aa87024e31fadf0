use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Canteen, User};

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterCanteenRequest {
    pub name: String,
    pub location: String,
    pub owner_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCanteenRequest {
    pub name: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddStaffRequest {
    pub staff_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CanteenDetail {
    pub canteen: Canteen,
    pub owners: Vec<User>,
    pub staff: Vec<User>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CanteenList {
    pub items: Vec<Canteen>,
}
