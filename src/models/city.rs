use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::arrival_point::Entity")]
    ArrivalPoints,
}

impl Related<super::arrival_point::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ArrivalPoints.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
