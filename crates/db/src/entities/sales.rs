//! `SeaORM` Entity for sales table.

use granary_core::trading::SaleRecord;
use granary_shared::types::{CommodityId, PartyId, SaleId};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::PaymentStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "sales")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub commodity_id: Uuid,
    pub customer_id: Uuid,
    pub sale_date: Date,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub quantity: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 6)))")]
    pub unit_price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub total_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub cogs: Decimal,
    pub payment_status: PaymentStatus,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::commodities::Entity",
        from = "Column::CommodityId",
        to = "super::commodities::Column::Id"
    )]
    Commodities,
    #[sea_orm(
        belongs_to = "super::parties::Entity",
        from = "Column::CustomerId",
        to = "super::parties::Column::Id"
    )]
    Customers,
}

impl Related<super::commodities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Commodities.def()
    }
}

impl Related<super::parties::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for SaleRecord {
    fn from(model: Model) -> Self {
        Self {
            id: SaleId::from_uuid(model.id),
            commodity_id: CommodityId::from_uuid(model.commodity_id),
            customer_id: PartyId::from_uuid(model.customer_id),
            sale_date: model.sale_date,
            quantity: model.quantity,
            unit_price: model.unit_price,
            total_amount: model.total_amount,
            cogs: model.cogs,
            payment_status: model.payment_status.into(),
        }
    }
}
