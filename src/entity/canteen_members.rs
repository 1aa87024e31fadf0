use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "canteen_members")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub canteen_id: Uuid,
    pub user_id: Uuid,
    pub member_role: String,
    pub created_at: DateTimeWithTimeZone,
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
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
}

impl Related<super::canteens::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Canteens.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
