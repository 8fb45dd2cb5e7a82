/// SMTP settings; absent in development, where emails go to the log.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

/// Service configuration sourced from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub kafka_brokers: String,
    pub kafka_group_id: String,
    pub admin_email: String,
    pub from_email: String,
    pub smtp: Option<SmtpConfig>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let smtp = match std::env::var("SMTP_HOST") {
            Ok(host) => Some(SmtpConfig {
                host,
                port: std::env::var("SMTP_PORT")
                    .unwrap_or_else(|_| "587".to_string())
                    .parse()?,
                username: std::env::var("SMTP_USER").unwrap_or_default(),
                password: std::env::var("SMTP_PASS").unwrap_or_default(),
            }),
            Err(_) => None,
        };

        Ok(Config {
            port: std::env::var("NOTIFICATION_SERVICE_PORT")
                .unwrap_or_else(|_| "3004".to_string())
                .parse()?,
            kafka_brokers: std::env::var("KAFKA_BROKERS")
                .unwrap_or_else(|_| "localhost:9092".to_string()),
            kafka_group_id: std::env::var("KAFKA_GROUP_ID")
                .unwrap_or_else(|_| "battery-passport-group".to_string()),
            admin_email: std::env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@batterypassport.com".to_string()),
            from_email: std::env::var("FROM_EMAIL")
                .unwrap_or_else(|_| "noreply@batterypassport.com".to_string()),
            smtp,
        })
    }
}
