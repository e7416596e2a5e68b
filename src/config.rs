use std::env;

use crate::constants::{DEFAULT_PAGE_SIZE, DEFAULT_SHOPPING_LIST_FILENAME};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database_url: String,
    pub allowed_origins: Vec<String>,
    pub environment: String,
    /// Key used to hash API tokens before they are looked up
    pub token_secret: String,
    pub media_root: String,
    pub media_url: String,
    pub page_size: i64,
    pub shopping_list_filename: String,
    pub log_requests: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if it exists (development)
        dotenvy::dotenv().ok();

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| "Invalid SERVER_PORT")?;

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://./data/foodgram.db".to_string());

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let token_secret = env::var("TOKEN_SECRET")
            .map_err(|_| "TOKEN_SECRET must be set for API token verification")?;

        let media_root = env::var("MEDIA_ROOT").unwrap_or_else(|_| "./media".to_string());
        let media_url = env::var("MEDIA_URL").unwrap_or_else(|_| "/media/".to_string());

        let page_size = env::var("PAGE_SIZE")
            .unwrap_or_else(|_| DEFAULT_PAGE_SIZE.to_string())
            .parse::<i64>()
            .ok()
            .filter(|size| *size > 0)
            .ok_or("Invalid PAGE_SIZE")?;

        let shopping_list_filename = env::var("SHOPPING_LIST_FILENAME")
            .unwrap_or_else(|_| DEFAULT_SHOPPING_LIST_FILENAME.to_string());

        let log_requests = env::var("LOG_REQUESTS")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(true);

        Ok(Config {
            server_host,
            server_port,
            database_url,
            allowed_origins,
            environment,
            token_secret,
            media_root,
            media_url,
            page_size,
            shopping_list_filename,
            log_requests,
        })
    }

    /// Get server address as string
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
