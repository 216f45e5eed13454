//! Payment initiation.
//!
//! The gateway's wire contract (pull/push/callback) lives outside this
//! repository; the engine only needs "start a payment, tell me the outcome
//! text". [`GatewayClient`] is the thin HTTP implementation the server
//! binary boots with.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::properties::Property;
use crate::domain::DomainError;

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Initiates a pull payment of `amount` RWF against the payer's mobile
    /// money account and returns the gateway's status text.
    async fn initiate(
        &self,
        property: &Property,
        payer_phone: &str,
        amount: f64,
    ) -> Result<String, DomainError>;
}

#[derive(Debug, Serialize)]
struct PullRequest<'a> {
    property_id: &'a str,
    msisdn: &'a str,
    amount: f64,
}

#[derive(Debug, Deserialize)]
struct PullResponse {
    status: String,
}

/// HTTP client for the external payment gateway.
pub struct GatewayClient {
    client: reqwest::Client,
    base_url: String,
}

impl GatewayClient {
    pub fn new(base_url: impl Into<String>) -> GatewayClient {
        GatewayClient {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl PaymentGateway for GatewayClient {
    async fn initiate(
        &self,
        property: &Property,
        payer_phone: &str,
        amount: f64,
    ) -> Result<String, DomainError> {
        let body = PullRequest {
            property_id: &property.id,
            msisdn: payer_phone,
            amount,
        };

        let response = self
            .client
            .post(format!("{}/payments/pull", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::Gateway(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DomainError::Gateway(format!(
                "gateway answered {}",
                response.status()
            )));
        }

        let parsed: PullResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Gateway(e.to_string()))?;
        Ok(parsed.status)
    }
}
