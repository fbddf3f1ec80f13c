use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One scheduled stop on a route. `price` is the cumulative fare from the
/// route's departure point up to this stop; `stop_order` is 1-based and
/// unique within a route.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "route_stops")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub route_id: i32,
    pub arrival_point_id: i32,
    pub stop_order: i32,
    pub price: f64,
    pub arrival_time: String, // "%Y-%m-%d %H:%M:%S"
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::route::Entity",
        from = "Column::RouteId",
        to = "super::route::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Route,
    #[sea_orm(
        belongs_to = "super::arrival_point::Entity",
        from = "Column::ArrivalPointId",
        to = "super::arrival_point::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    ArrivalPoint,
}

impl Related<super::route::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Route.def()
    }
}

impl Related<super::arrival_point::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ArrivalPoint.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
