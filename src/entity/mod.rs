pub mod audit_logs;
pub mod canteen_members;
pub mod canteens;
pub mod discount_menu_items;
pub mod discounts;
pub mod inventory_items;
pub mod menu_items;
pub mod order_items;
pub mod orders;
pub mod suppliers;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use canteen_members::Entity as CanteenMembers;
pub use canteens::Entity as Canteens;
pub use discount_menu_items::Entity as DiscountMenuItems;
pub use discounts::Entity as Discounts;
pub use inventory_items::Entity as InventoryItems;
pub use menu_items::Entity as MenuItems;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use suppliers::Entity as Suppliers;
pub use users::Entity as Users;
