use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{service_center, service_type};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service_center_offering")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub service_center_id: Uuid,
    pub service_type_id: Uuid,
    pub status: String,
    pub base_price: f64,
    pub discount_percentage: Option<f64>,
    pub discount_valid_until: Option<DateTimeWithTimeZone>,
    pub time_to_complete: Option<i32>,
    pub available_priorities: Json,
    pub priority_prices: Json,
    pub minimum_advance_booking: Option<i32>,
    pub terms_and_conditions: Option<String>,
    pub payment_policy: String,
    pub warranty_days: Option<i32>,
    pub warranty_kilometers: Option<i32>,
    pub is_highlighted: bool,
    pub has_emergency_service: bool,
    pub emergency_service_fee: Option<f64>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    ServiceCenter,
    ServiceType,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::ServiceCenter => Entity::belongs_to(service_center::Entity)
                .from(Column::ServiceCenterId)
                .to(service_center::Column::Id)
                .into(),
            Relation::ServiceType => Entity::belongs_to(service_type::Entity)
                .from(Column::ServiceTypeId)
                .to(service_type::Column::Id)
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
