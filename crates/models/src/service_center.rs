use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{address, offering, operating_hour, slot};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service_center")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub status: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Address,
    OperatingHour,
    Slot,
    Offering,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Address => Entity::has_one(address::Entity).into(),
            Relation::OperatingHour => Entity::has_many(operating_hour::Entity).into(),
            Relation::Slot => Entity::has_many(slot::Entity).into(),
            Relation::Offering => Entity::has_many(offering::Entity).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
