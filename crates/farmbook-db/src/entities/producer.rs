//! Producer entity: a registered grower identified by CPF

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "producers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// CPF in normalized `DDD.DDD.DDD-DD` form
    ///
    /// Uniqueness is checked by the registry before writes, not by the schema.
    pub cpf: String,

    /// Display name
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Producer owns farms
    #[sea_orm(has_many = "super::farm::Entity")]
    Farms,
}

impl Related<super::farm::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Farms.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
