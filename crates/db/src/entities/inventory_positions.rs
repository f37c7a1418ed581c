//! `SeaORM` Entity for inventory_positions table.

use granary_core::inventory::InventoryPosition;
use granary_shared::types::CommodityId;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_positions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub commodity_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub stock: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 6)))")]
    pub average_cost: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub carrying_value: Decimal,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::commodities::Entity",
        from = "Column::CommodityId",
        to = "super::commodities::Column::Id"
    )]
    Commodities,
}

impl Related<super::commodities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Commodities.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for InventoryPosition {
    fn from(model: Model) -> Self {
        Self {
            commodity_id: CommodityId::from_uuid(model.commodity_id),
            stock: model.stock,
            average_cost: model.average_cost,
            carrying_value: model.carrying_value,
        }
    }
}
