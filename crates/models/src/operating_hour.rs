use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::service_center;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "operating_hour")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub service_center_id: Uuid,
    /// 0 = Sunday .. 6 = Saturday
    pub day_of_week: i32,
    pub open_time: Option<Time>,
    pub close_time: Option<Time>,
    pub is_closed: bool,
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
