use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub const KIND_LIMITED: &str = "limited";
pub const KIND_PERMANENT: &str = "permanent";

/// A class of discount. `discount_limit` is required (and only meaningful)
/// for the 'limited' kind.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "discount_types")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub kind: String, // 'limited', 'permanent'
    pub discount_percent: f64,
    pub discount_limit: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::discount::Entity")]
    Discounts,
}

impl Related<super::discount::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Discounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
