//! Farm entity: a land holding, optionally owned by a producer

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "farms")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Farm display name (used to resolve harvests in bulk registration)
    pub name: String,

    pub city: String,

    /// Region/state code, e.g. "SP"
    pub state: String,

    /// Total area in hectares
    pub total_area: f64,

    /// Arable area in hectares
    pub arable_area: f64,

    /// Owning producer (NULL while the farm is unlinked)
    pub producer_id: Option<i32>,
}

impl Model {
    /// Area not used for crops. Not clamped: negative when arable exceeds total.
    pub fn vegetation_area(&self) -> f64 {
        self.total_area - self.arable_area
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Farm belongs to a producer (optional)
    #[sea_orm(
        belongs_to = "super::producer::Entity",
        from = "Column::ProducerId",
        to = "super::producer::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Producer,

    /// Farm has harvests
    #[sea_orm(has_many = "super::harvest::Entity")]
    Harvests,
}

impl Related<super::producer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Producer.def()
    }
}

impl Related<super::harvest::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Harvests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
