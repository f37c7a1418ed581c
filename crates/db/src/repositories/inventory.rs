//! Inventory repository for moving-average positions.
//!
//! A position row is created lazily on first use with
//! `INSERT ... ON CONFLICT DO NOTHING` and then locked `FOR UPDATE`, so
//! concurrent first receipts of the same commodity never create two rows
//! and read-modify-write cycles on one commodity are serialised.

use chrono::Utc;
use granary_core::inventory::{InventoryError, InventoryPosition};
use granary_shared::types::CommodityId;
use rust_decimal::Decimal;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::inventory_positions;

/// Error types for inventory operations.
#[derive(Debug, thiserror::Error)]
pub enum StockError {
    /// Costing rule violated.
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Inventory repository for per-commodity positions.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    db: DatabaseConnection,
}

impl InventoryRepository {
    /// Creates a new inventory repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the position of a commodity, creating an empty one if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn get_or_create_position(
        &self,
        commodity_id: CommodityId,
    ) -> Result<InventoryPosition, StockError> {
        let txn = self.db.begin().await?;
        let model = lock_position(&txn, commodity_id).await?;
        txn.commit().await?;
        Ok(model.into())
    }

    /// Reads a position without creating or locking it.
    ///
    /// Returns an empty position for a commodity that was never traded.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn position(&self, commodity_id: CommodityId) -> Result<InventoryPosition, StockError> {
        let model = inventory_positions::Entity::find()
            .filter(inventory_positions::Column::CommodityId.eq(commodity_id.into_inner()))
            .one(&self.db)
            .await?;
        Ok(model.map_or_else(|| InventoryPosition::empty(commodity_id), Into::into))
    }

    /// Receives stock at `unit_cost` and returns the new average cost.
    ///
    /// # Errors
    ///
    /// Returns `NegativeQuantity`, `NegativeCost` or `AmountOutOfRange`;
    /// nothing is written.
    pub async fn record_receipt(
        &self,
        commodity_id: CommodityId,
        quantity: Decimal,
        unit_cost: Decimal,
    ) -> Result<Decimal, StockError> {
        let txn = self.db.begin().await?;
        let model = lock_position(&txn, commodity_id).await?;

        let mut position = InventoryPosition::from(model.clone());
        let average_cost = position.receive(quantity, unit_cost)?;
        save_position(&txn, model, &position).await?;

        txn.commit().await?;
        Ok(average_cost)
    }

    /// Issues stock at the current average and returns the cost of goods sold,
    /// rounded to money scale. Selling out relieves the whole carrying value.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientStock` when `quantity` exceeds the stock on hand;
    /// nothing is written.
    pub async fn record_issue(
        &self,
        commodity_id: CommodityId,
        quantity: Decimal,
    ) -> Result<Decimal, StockError> {
        let txn = self.db.begin().await?;
        let model = lock_position(&txn, commodity_id).await?;

        let mut position = InventoryPosition::from(model.clone());
        let cogs = position.issue(quantity)?;
        save_position(&txn, model, &position).await?;

        txn.commit().await?;
        Ok(cogs)
    }
}

/// Creates the position row if absent, then locks it `FOR UPDATE`.
pub(crate) async fn lock_position<C: ConnectionTrait>(
    conn: &C,
    commodity_id: CommodityId,
) -> Result<inventory_positions::Model, DbErr> {
    let row = inventory_positions::ActiveModel {
        id: Set(Uuid::now_v7()),
        commodity_id: Set(commodity_id.into_inner()),
        stock: Set(Decimal::ZERO),
        average_cost: Set(Decimal::ZERO),
        carrying_value: Set(Decimal::ZERO),
        updated_at: Set(Utc::now().into()),
    };
    inventory_positions::Entity::insert(row)
        .on_conflict(
            OnConflict::column(inventory_positions::Column::CommodityId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    inventory_positions::Entity::find()
        .filter(inventory_positions::Column::CommodityId.eq(commodity_id.into_inner()))
        .lock_exclusive()
        .one(conn)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("inventory position for {commodity_id}")))
}

/// Writes a costed position back to its locked row.
pub(crate) async fn save_position<C: ConnectionTrait>(
    conn: &C,
    model: inventory_positions::Model,
    position: &InventoryPosition,
) -> Result<inventory_positions::Model, DbErr> {
    let mut model: inventory_positions::ActiveModel = model.into();
    model.stock = Set(position.stock);
    model.average_cost = Set(position.average_cost);
    model.carrying_value = Set(position.carrying_value);
    model.updated_at = Set(Utc::now().into());
    model.update(conn).await
}
