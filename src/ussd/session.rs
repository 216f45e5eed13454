//! Gateway session envelope.
//!
//! One HTTP POST per round-trip; every inbound field is mandatory. The
//! response echoes the session and gateway identifiers and carries the menu
//! text plus the continuation flag. On the wire `end` is called
//! `continueSession`: 1 keeps the session open, 0 closes it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ussd::error::UssdError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub service_code: String,
    #[serde(default)]
    pub network_code: String,
    #[serde(default)]
    pub gw_ref: String,
    #[serde(default)]
    pub msisdn: String,
    #[serde(default)]
    pub gw_tstamp: String,
    #[serde(default)]
    pub user_input: String,
    #[serde(default)]
    pub service_id: String,
    #[serde(default)]
    pub tenant_id: String,
}

impl SessionRequest {
    /// Rejects an incomplete envelope before tokenization. `user_input`
    /// must be present but may tokenize to nothing: the first dial of a
    /// session is the bare service code.
    pub fn validate(&self) -> Result<(), UssdError> {
        let required: [(&'static str, &str); 9] = [
            ("sessionId", &self.session_id),
            ("serviceCode", &self.service_code),
            ("networkCode", &self.network_code),
            ("gwRef", &self.gw_ref),
            ("msisdn", &self.msisdn),
            ("gwTstamp", &self.gw_tstamp),
            ("userInput", &self.user_input),
            ("serviceId", &self.service_id),
            ("tenantId", &self.tenant_id),
        ];
        for (name, value) in required {
            if value.is_empty() {
                return Err(UssdError::InvalidEnvelope(name));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: String,
    pub gw_ref: String,
    pub app_ref: String,
    pub gw_tstamp: DateTime<Utc>,
    pub text: String,
    /// 1 = keep the session open, 0 = close it.
    #[serde(rename = "continueSession")]
    pub end: u8,
}
