pub mod auth;
pub mod canteens;
pub mod discounts;
pub mod inventory;
pub mod menu;
pub mod orders;
pub mod suppliers;
