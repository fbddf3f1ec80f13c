use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A purchased seat on one segment of a route. The (carriage_id,
/// seat_number) pair is unique; `price` is derived from the route's stop
/// list at purchase time. `order_id` goes NULL if the order is deleted.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tickets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub carriage_id: i32,
    pub seat_number: i32,
    pub departure_point_id: i32,
    pub arrival_point_id: i32,
    pub price: f64,
    pub order_id: Option<i32>,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::carriage::Entity",
        from = "Column::CarriageId",
        to = "super::carriage::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Carriage,
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Order,
    #[sea_orm(
        belongs_to = "super::arrival_point::Entity",
        from = "Column::DeparturePointId",
        to = "super::arrival_point::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    DeparturePoint,
    #[sea_orm(
        belongs_to = "super::arrival_point::Entity",
        from = "Column::ArrivalPointId",
        to = "super::arrival_point::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    ArrivalPoint,
}

impl Related<super::carriage::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Carriage.def()
    }
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
