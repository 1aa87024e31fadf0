use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "inventory_items")]
pub struct Model {
    #[sea_orm(primary_key)]
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
    pub last_restocked: Option<DateTimeWithTimeZone>,
    pub expiry_date: Option<DateTimeWithTimeZone>,
    pub storage_location: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::canteens::Entity",
        from = "Column::CanteenId",
        to = "super::canteens::Column::Id"
    )]
    Canteens,
    #[sea_orm(
        belongs_to = "super::suppliers::Entity",
        from = "Column::SupplierId",
        to = "super::suppliers::Column::Id"
    )]
    Suppliers,
}

impl Related<super::canteens::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Canteens.def()
    }
}

impl Related<super::suppliers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Suppliers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
