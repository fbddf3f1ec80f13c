use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "routes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub departure_point_id: i32,
    pub departure_time: String, // "%Y-%m-%d %H:%M:%S"
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::arrival_point::Entity",
        from = "Column::DeparturePointId",
        to = "super::arrival_point::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    DeparturePoint,
    #[sea_orm(has_many = "super::route_stop::Entity")]
    Stops,
    #[sea_orm(has_many = "super::carriage::Entity")]
    Carriages,
}

impl Related<super::arrival_point::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DeparturePoint.def()
    }
}

impl Related<super::route_stop::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Stops.def()
    }
}

impl Related<super::carriage::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Carriages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
