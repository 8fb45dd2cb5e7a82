use std::time::Duration;

/// Service configuration sourced from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub kafka_brokers: String,
    pub auth_service_url: String,
    pub verify_timeout: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Config {
            port: std::env::var("PASSPORT_SERVICE_PORT")
                .unwrap_or_else(|_| "3002".to_string())
                .parse()?,
            kafka_brokers: std::env::var("KAFKA_BROKERS")
                .unwrap_or_else(|_| "localhost:9092".to_string()),
            auth_service_url: std::env::var("AUTH_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:3001".to_string()),
            verify_timeout: Duration::from_secs(
                std::env::var("AUTH_VERIFY_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()?,
            ),
        })
    }
}
