//! `SeaORM` Entity for parties table.

use granary_core::trading::Party;
use granary_shared::types::PartyId;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "parties")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub is_supplier: bool,
    pub is_customer: bool,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Party {
    fn from(model: Model) -> Self {
        Self {
            id: PartyId::from_uuid(model.id),
            name: model.name,
            is_supplier: model.is_supplier,
            is_customer: model.is_customer,
            phone: model.phone,
            address: model.address,
            email: model.email,
        }
    }
}
