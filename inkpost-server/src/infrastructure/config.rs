use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    /// Posts per listing page, consumed by the listing services.
    pub page_size: u32,
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid PORT: {}", e))?;
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
        let jwt_secret =
            std::env::var("JWT_SECRET").map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?;
        let token_ttl_hours = std::env::var("TOKEN_TTL_HOURS")
            .unwrap_or_else(|_| "24".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid TOKEN_TTL_HOURS: {}", e))?;
        let page_size = std::env::var("PAGE_SIZE")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid PAGE_SIZE: {}", e))?;
        let cors_origins = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            database_url,
            jwt_secret,
            token_ttl_hours,
            page_size,
            cors_origins,
        })
    }
}
