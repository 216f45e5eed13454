//! Postgres repositories.
//!
//! Straightforward sqlx implementations of the lookup contracts the dialog
//! engine consumes. Row-not-found maps to the domain's typed not-found so
//! screens can branch on it.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::{
    Address, DomainError, Invoice, InvoiceLedger, Owner, OwnerDirectory, Property, PropertyCatalog,
};

fn not_found(entity: &'static str) -> impl FnOnce(sqlx::Error) -> DomainError {
    move |err| match err {
        sqlx::Error::RowNotFound => DomainError::NotFound(entity),
        other => DomainError::Store(other),
    }
}

#[derive(Clone)]
pub struct PgOwnerDirectory {
    pool: PgPool,
}

impl PgOwnerDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OwnerDirectory for PgOwnerDirectory {
    async fn retrieve(&self, id: &str) -> Result<Owner, DomainError> {
        let row = sqlx::query(
            r#"SELECT id, fname, lname, phone
               FROM owners
               WHERE id = $1"#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found("owner"))?;

        Ok(Owner {
            id: row.get("id"),
            fname: row.get("fname"),
            lname: row.get("lname"),
            phone: row.get("phone"),
        })
    }

    async fn retrieve_by_phone(&self, phone: &str) -> Result<Owner, DomainError> {
        let row = sqlx::query(
            r#"SELECT id, fname, lname, phone
               FROM owners
               WHERE phone = $1"#,
        )
        .bind(phone)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found("owner"))?;

        Ok(Owner {
            id: row.get("id"),
            fname: row.get("fname"),
            lname: row.get("lname"),
            phone: row.get("phone"),
        })
    }
}

#[derive(Clone)]
pub struct PgPropertyCatalog {
    pool: PgPool,
}

impl PgPropertyCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn property_from(row: &sqlx::postgres::PgRow) -> Property {
    Property {
        id: row.get("id"),
        owner_id: row.get("owner_id"),
        address: Address {
            sector: row.get("sector"),
            cell: row.get("cell"),
            village: row.get("village"),
        },
        due: row.get("due"),
    }
}

#[async_trait]
impl PropertyCatalog for PgPropertyCatalog {
    async fn retrieve(&self, id: &str) -> Result<Property, DomainError> {
        let row = sqlx::query(
            r#"SELECT id, owner_id, sector, cell, village, due
               FROM properties
               WHERE id = $1"#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found("property"))?;

        Ok(property_from(&row))
    }

    async fn retrieve_by_owner(
        &self,
        owner_id: &str,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Property>, DomainError> {
        let rows = sqlx::query(
            r#"SELECT id, owner_id, sector, cell, village, due
               FROM properties
               WHERE owner_id = $1
               ORDER BY created_at
               OFFSET $2 LIMIT $3"#,
        )
        .bind(owner_id)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(property_from).collect())
    }
}

#[derive(Clone)]
pub struct PgInvoiceLedger {
    pool: PgPool,
}

impl PgInvoiceLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InvoiceLedger for PgInvoiceLedger {
    async fn unpaid(&self, property_id: &str) -> Result<Vec<Invoice>, DomainError> {
        let rows = sqlx::query(
            r#"SELECT id, property_id, amount, created_at
               FROM invoices
               WHERE property_id = $1 AND status = 'pending'
               ORDER BY created_at"#,
        )
        .bind(property_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| Invoice {
                id: row.get("id"),
                property_id: row.get("property_id"),
                amount: row.get("amount"),
                created_at: row.get("created_at"),
            })
            .collect())
    }
}
