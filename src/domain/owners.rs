//! Property owners.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Owner {
    pub id: String,
    pub fname: String,
    pub lname: String,
    pub phone: String,
}

/// Owner lookup, keyed by id or by registered phone number.
#[async_trait]
pub trait OwnerDirectory: Send + Sync {
    async fn retrieve(&self, id: &str) -> Result<Owner, DomainError>;

    async fn retrieve_by_phone(&self, phone: &str) -> Result<Owner, DomainError>;
}
