use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::service_type;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service_category")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub vehicle_type: Option<String>,
    pub icon: Option<String>,
    pub display_order: Option<i32>,
    pub is_popular: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    ServiceType,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::ServiceType => Entity::has_many(service_type::Entity).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
