use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
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
        belongs_to = "super::discounts::Entity",
        from = "Column::DiscountId",
        to = "super::discounts::Column::Id"
    )]
    Discounts,
    #[sea_orm(has_many = "super::order_items::Entity")]
    OrderItems,
}

impl Related<super::canteens::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Canteens.def()
    }
}

impl Related<super::discounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Discounts.def()
    }
}

impl Related<super::order_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use sea_orm::{DbBackend, EntityTrait, QueryTrait};

    use super::Entity as Orders;
    use crate::entity::discounts::Entity as Discounts;

    #[test]
    fn orders_join_discounts() {
        let sql = Orders::find()
            .find_also_related(Discounts)
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.contains("\"discounts\""));
    }
}
