use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::service_center;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "slot")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub service_center_id: Uuid,
    pub slot_date: Date,
    pub start_time: Time,
    pub end_time: Time,
    pub capacity: i32,
    pub booked_count: i32,
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    ServiceCenter,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::ServiceCenter => Entity::belongs_to(service_center::Entity)
                .from(Column::ServiceCenterId)
                .to(service_center::Column::Id)
                .into(),
        }
    }
}

impl Related<service_center::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceCenter.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
