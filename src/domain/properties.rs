//! Registered properties and their tax dues.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Address {
    pub sector: String,
    pub cell: String,
    pub village: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    /// Municipal property code, e.g. `KG123456`.
    pub id: String,
    pub owner_id: String,
    pub address: Address,
    /// Monthly amount due, in RWF.
    pub due: f64,
}

#[async_trait]
pub trait PropertyCatalog: Send + Sync {
    async fn retrieve(&self, id: &str) -> Result<Property, DomainError>;

    /// A page of the owner's properties, in registration order.
    async fn retrieve_by_owner(
        &self,
        owner_id: &str,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Property>, DomainError>;
}
