use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::vehicle_model;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "brand")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub logo: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    VehicleModel,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::VehicleModel => Entity::has_many(vehicle_model::Entity).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
