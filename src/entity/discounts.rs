use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "discounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub canteen_id: Uuid,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub kind: String,
    pub value: i64,
    pub min_order_value: i64,
    pub max_discount_amount: Option<i64>,
    pub start_date: DateTimeWithTimeZone,
    pub end_date: DateTimeWithTimeZone,
    pub is_active: bool,
    pub usage_limit: Option<i32>,
    pub usage_count: i32,
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
    #[sea_orm(has_many = "super::discount_menu_items::Entity")]
    DiscountMenuItems,
    #[sea_orm(has_many = "super::orders::Entity")]
    Orders,
}

impl Related<super::canteens::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Canteens.def()
    }
}

impl Related<super::discount_menu_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DiscountMenuItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
