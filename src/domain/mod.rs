//! Domain entities and collaborator contracts.
//!
//! The dialog engine consumes these traits; it does not own their
//! implementations. Production wiring plugs in the Postgres repositories
//! from [`crate::store`] and the payment gateway client; tests plug in
//! in-memory fakes.

pub mod invoices;
pub mod owners;
pub mod payment;
pub mod properties;

use thiserror::Error;

pub use invoices::{Invoice, InvoiceLedger};
pub use owners::{Owner, OwnerDirectory};
pub use payment::PaymentGateway;
pub use properties::{Address, Property, PropertyCatalog};

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("payment gateway: {0}")]
    Gateway(String),
}
