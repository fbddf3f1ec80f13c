use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A discount granted to one user. `usage_amount` counts applications;
/// a limited discount is deleted once it reaches its type's limit.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "discounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub discount_type_id: i32,
    pub usage_amount: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::discount_type::Entity",
        from = "Column::DiscountTypeId",
        to = "super::discount_type::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    DiscountType,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::discount_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DiscountType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
