//! `SeaORM` Entity for expenses table.

use granary_core::trading::ExpenseRecord;
use granary_shared::types::{AccountId, ExpenseId, PartyId};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub expense_date: Date,
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub amount: Decimal,
    pub debit_account_id: Uuid,
    pub credit_account_id: Uuid,
    pub supplier_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::parties::Entity",
        from = "Column::SupplierId",
        to = "super::parties::Column::Id"
    )]
    Suppliers,
}

impl Related<super::parties::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Suppliers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ExpenseRecord {
    fn from(model: Model) -> Self {
        Self {
            id: ExpenseId::from_uuid(model.id),
            expense_date: model.expense_date,
            description: model.description,
            amount: model.amount,
            debit_account_id: AccountId::from_uuid(model.debit_account_id),
            credit_account_id: AccountId::from_uuid(model.credit_account_id),
            supplier_id: model.supplier_id.map(PartyId::from_uuid),
        }
    }
}
