//! `SeaORM` Entity for commodities table.
//!
//! Pricing units and conversion factors are stored as JSONB; factors are
//! serialized as decimal strings so no precision is lost.

use std::collections::BTreeMap;

use granary_core::inventory::Commodity;
use granary_shared::types::CommodityId;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "commodities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub base_unit: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub allowed_pricing_units: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub conversion_factors: Json,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::inventory_positions::Entity")]
    InventoryPositions,
    #[sea_orm(has_many = "super::purchases::Entity")]
    Purchases,
    #[sea_orm(has_many = "super::sales::Entity")]
    Sales,
}

impl Related<super::inventory_positions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InventoryPositions.def()
    }
}

impl Related<super::purchases::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Purchases.def()
    }
}

impl Related<super::sales::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sales.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Commodity {
    type Error = DbErr;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let allowed_pricing_units: Vec<String> =
            serde_json::from_value(model.allowed_pricing_units)
                .map_err(|e| DbErr::Json(e.to_string()))?;
        let conversion_factors: BTreeMap<String, Decimal> =
            serde_json::from_value(model.conversion_factors)
                .map_err(|e| DbErr::Json(e.to_string()))?;

        Ok(Self {
            id: CommodityId::from_uuid(model.id),
            name: model.name,
            base_unit: model.base_unit,
            allowed_pricing_units,
            conversion_factors,
            is_active: model.is_active,
        })
    }
}
