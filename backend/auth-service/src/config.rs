/// Service configuration sourced from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub jwt_secret: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Config {
            port: std::env::var("AUTH_SERVICE_PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()?,
            jwt_secret: std::env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?,
        })
    }
}
