//! Environment-backed configuration.

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Dial prefix identifying this application at the telco, stripped by
    /// the executor before menu traversal.
    pub ussd_prefix: String,
    pub gateway_url: String,
}

impl Config {
    pub fn from_env() -> Config {
        Config {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgresql://localhost:5432/citypay".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            ussd_prefix: std::env::var("USSD_PREFIX")
                .unwrap_or_else(|_| "*662*104#".to_string()),
            gateway_url: std::env::var("GATEWAY_URL")
                .unwrap_or_else(|_| "http://localhost:9000".to_string()),
        }
    }
}
