use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A car on a route. Seats are identified by 1..=seat_amount.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "carriages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub route_id: i32,
    pub carriage_type_id: i32,
    pub seat_amount: i32,
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
        belongs_to = "super::carriage_type::Entity",
        from = "Column::CarriageTypeId",
        to = "super::carriage_type::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    CarriageType,
    #[sea_orm(has_many = "super::ticket::Entity")]
    Tickets,
}

impl Related<super::route::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Route.def()
    }
}

impl Related<super::carriage_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CarriageType.def()
    }
}

impl Related<super::ticket::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tickets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
