use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Known carriage kinds. Creation validates against this set.
pub const CARRIAGE_KINDS: &[&str] = &["seated", "coupe", "platzkart"];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "carriage_types")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String, // 'seated', 'coupe', 'platzkart'
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::carriage::Entity")]
    Carriages,
}

impl Related<super::carriage::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Carriages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
