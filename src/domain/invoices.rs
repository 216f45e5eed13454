//! Monthly tax invoices.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: i64,
    pub property_id: String,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait InvoiceLedger: Send + Sync {
    /// Unpaid invoices for a property, oldest first.
    async fn unpaid(&self, property_id: &str) -> Result<Vec<Invoice>, DomainError>;
}
