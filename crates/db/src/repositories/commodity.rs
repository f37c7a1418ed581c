//! Commodity repository.

use chrono::Utc;
use granary_core::inventory::Commodity;
use granary_shared::types::CommodityId;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::entities::commodities;

/// Error types for commodity operations.
#[derive(Debug, thiserror::Error)]
pub enum CommodityError {
    /// Commodity name already exists.
    #[error("Commodity '{0}' already exists")]
    DuplicateName(String),

    /// Commodity not found.
    #[error("Commodity not found: {0}")]
    NotFound(CommodityId),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Commodity repository for master data operations.
#[derive(Debug, Clone)]
pub struct CommodityRepository {
    db: DatabaseConnection,
}

impl CommodityRepository {
    /// Creates a new commodity repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Persists a new commodity with its pricing units.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateName` if the name is taken.
    pub async fn create_commodity(&self, commodity: &Commodity) -> Result<Commodity, CommodityError> {
        let existing = commodities::Entity::find()
            .filter(commodities::Column::Name.eq(&commodity.name))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(CommodityError::DuplicateName(commodity.name.clone()));
        }

        let allowed_pricing_units = serde_json::to_value(&commodity.allowed_pricing_units)
            .map_err(|e| DbErr::Json(e.to_string()))?;
        let conversion_factors = serde_json::to_value(&commodity.conversion_factors)
            .map_err(|e| DbErr::Json(e.to_string()))?;

        let now = Utc::now().into();
        let model = commodities::ActiveModel {
            id: Set(commodity.id.into_inner()),
            name: Set(commodity.name.clone()),
            base_unit: Set(commodity.base_unit.clone()),
            allowed_pricing_units: Set(allowed_pricing_units),
            conversion_factors: Set(conversion_factors),
            is_active: Set(commodity.is_active),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = model.insert(&self.db).await?;
        Ok(Commodity::try_from(model)?)
    }

    /// Finds a commodity by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or the stored units
    /// cannot be decoded.
    pub async fn find_commodity(&self, id: CommodityId) -> Result<Option<Commodity>, CommodityError> {
        Ok(load_commodity(&self.db, id).await?)
    }

    /// Finds a commodity by its unique name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Commodity>, CommodityError> {
        let model = commodities::Entity::find()
            .filter(commodities::Column::Name.eq(name))
            .one(&self.db)
            .await?;
        Ok(model.map(Commodity::try_from).transpose()?)
    }

    /// Lists commodities ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_commodities(&self) -> Result<Vec<Commodity>, CommodityError> {
        let models = commodities::Entity::find()
            .order_by_asc(commodities::Column::Name)
            .all(&self.db)
            .await?;
        let commodities = models
            .into_iter()
            .map(Commodity::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(commodities)
    }

    /// Activates or deactivates a commodity.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if absent.
    pub async fn set_active(&self, id: CommodityId, active: bool) -> Result<Commodity, CommodityError> {
        let model = commodities::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(CommodityError::NotFound(id))?;

        let mut model: commodities::ActiveModel = model.into();
        model.is_active = Set(active);
        model.updated_at = Set(Utc::now().into());

        let model = model.update(&self.db).await?;
        Ok(Commodity::try_from(model)?)
    }
}

/// Loads a commodity on any connection, including an open transaction.
pub(crate) async fn load_commodity<C: ConnectionTrait>(
    conn: &C,
    id: CommodityId,
) -> Result<Option<Commodity>, DbErr> {
    commodities::Entity::find_by_id(id.into_inner())
        .one(conn)
        .await?
        .map(Commodity::try_from)
        .transpose()
}
