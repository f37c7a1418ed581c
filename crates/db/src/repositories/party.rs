//! Party repository for suppliers and customers.

use chrono::Utc;
use granary_core::trading::Party;
use granary_shared::types::PartyId;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set,
};

use crate::entities::parties;

/// Party repository for supplier and customer records.
#[derive(Debug, Clone)]
pub struct PartyRepository {
    db: DatabaseConnection,
}

impl PartyRepository {
    /// Creates a new party repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Persists a new party.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn create_party(&self, party: &Party) -> Result<Party, DbErr> {
        let now = Utc::now().into();
        let model = parties::ActiveModel {
            id: Set(party.id.into_inner()),
            name: Set(party.name.clone()),
            is_supplier: Set(party.is_supplier),
            is_customer: Set(party.is_customer),
            phone: Set(party.phone.clone()),
            address: Set(party.address.clone()),
            email: Set(party.email.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = model.insert(&self.db).await?;
        Ok(model.into())
    }

    /// Finds a party by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_party(&self, id: PartyId) -> Result<Option<Party>, DbErr> {
        load_party(&self.db, id).await
    }

    /// Lists parties ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_parties(&self) -> Result<Vec<Party>, DbErr> {
        let models = parties::Entity::find()
            .order_by_asc(parties::Column::Name)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }
}

/// Loads a party on any connection, including an open transaction.
pub(crate) async fn load_party<C: ConnectionTrait>(
    conn: &C,
    id: PartyId,
) -> Result<Option<Party>, DbErr> {
    let model = parties::Entity::find_by_id(id.into_inner()).one(conn).await?;
    Ok(model.map(Into::into))
}
