use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::canteen_members::Entity")]
    CanteenMembers,
}

impl Related<super::canteen_members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CanteenMembers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
