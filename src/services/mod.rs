pub mod auth_service;
pub mod canteen_service;
pub mod discount_service;
pub mod inventory_service;
pub mod menu_service;
pub mod order_service;
pub mod supplier_service;
