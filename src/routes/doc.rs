use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        canteens::{AddStaffRequest, CanteenDetail, CanteenList, RegisterCanteenRequest, UpdateCanteenRequest},
        discounts::{
            CreateDiscountRequest, DiscountList, DiscountSummary, UpdateDiscountRequest,
            ValidateDiscountRequest, ValidateDiscountResponse,
        },
        inventory::{
            CreateInventoryItemRequest, InventoryList, StockAdjustRequest, StockOperation,
            UpdateInventoryItemRequest,
        },
        menu::{CreateMenuItemRequest, MenuItemList, UpdateMenuItemRequest},
        orders::{
            CreateOrderRequest, OrderLineRequest, OrderList, OrderStatistics, OrderWithItems,
            UpdateOrderRequest, UpdateOrderStatusRequest,
        },
        suppliers::{CreateSupplierRequest, SupplierList, UpdateSupplierRequest},
    },
    models::{Canteen, Discount, InventoryItem, MenuItem, Order, OrderItem, Supplier, User},
    response::{ApiResponse, Meta},
    routes::{auth, canteens, discounts, health, inventory, menu, orders, params, suppliers},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        canteens::register_canteen,
        canteens::list_canteens,
        canteens::get_canteen,
        canteens::update_canteen,
        canteens::add_staff,
        canteens::remove_staff,
        menu::list_menu_items,
        menu::list_popular_items,
        menu::get_menu_item,
        menu::create_menu_item,
        menu::update_menu_item,
        menu::delete_menu_item,
        menu::toggle_availability,
        inventory::list_inventory,
        inventory::list_low_stock,
        inventory::get_inventory_item,
        inventory::create_inventory_item,
        inventory::update_inventory_item,
        inventory::delete_inventory_item,
        inventory::adjust_stock,
        suppliers::list_suppliers,
        suppliers::get_supplier,
        suppliers::create_supplier,
        suppliers::update_supplier,
        suppliers::delete_supplier,
        suppliers::toggle_status,
        discounts::list_discounts,
        discounts::get_discount,
        discounts::create_discount,
        discounts::update_discount,
        discounts::delete_discount,
        discounts::validate_discount,
        orders::list_orders,
        orders::order_statistics,
        orders::get_order,
        orders::create_order,
        orders::update_order,
        orders::update_order_status
    ),
    components(
        schemas(
            User,
            Canteen,
            MenuItem,
            InventoryItem,
            Supplier,
            Discount,
            Order,
            OrderItem,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            RegisterCanteenRequest,
            UpdateCanteenRequest,
            AddStaffRequest,
            CanteenDetail,
            CanteenList,
            CreateMenuItemRequest,
            UpdateMenuItemRequest,
            MenuItemList,
            CreateInventoryItemRequest,
            UpdateInventoryItemRequest,
            StockOperation,
            StockAdjustRequest,
            InventoryList,
            CreateSupplierRequest,
            UpdateSupplierRequest,
            SupplierList,
            CreateDiscountRequest,
            UpdateDiscountRequest,
            DiscountSummary,
            ValidateDiscountRequest,
            ValidateDiscountResponse,
            DiscountList,
            CreateOrderRequest,
            OrderLineRequest,
            UpdateOrderRequest,
            UpdateOrderStatusRequest,
            OrderWithItems,
            OrderList,
            OrderStatistics,
            params::Pagination,
            params::SortOrder,
            Meta,
            ApiResponse<User>,
            ApiResponse<CanteenDetail>,
            ApiResponse<MenuItemList>,
            ApiResponse<InventoryList>,
            ApiResponse<SupplierList>,
            ApiResponse<DiscountList>,
            ApiResponse<OrderWithItems>,
            ApiResponse<OrderList>,
            ApiResponse<OrderStatistics>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Canteens", description = "Canteen registration and staffing"),
        (name = "Menu", description = "Menu item endpoints"),
        (name = "Inventory", description = "Inventory and stock endpoints"),
        (name = "Suppliers", description = "Supplier endpoints"),
        (name = "Discounts", description = "Discount endpoints"),
        (name = "Orders", description = "Order endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
