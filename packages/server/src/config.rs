use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

use crate::common::SecretString;

const DEFAULT_FIRECRAWL_BASE_URL: &str = "https://api.firecrawl.dev";
const DEFAULT_AI_GATEWAY_BASE_URL: &str = "https://ai.gateway.lovable.dev/v1";
const DEFAULT_AI_EXTRACTION_MODEL: &str = "google/gemini-2.5-flash";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub firecrawl_api_key: String,
    pub firecrawl_base_url: String,
    /// Without a gateway key every scraped competitor gets a manual-review row
    pub ai_gateway_api_key: Option<String>,
    pub ai_gateway_base_url: String,
    pub ai_extraction_model: String,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    /// Server-side key handed to the database encryption function
    pub pms_encryption_key: Option<SecretString>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            firecrawl_api_key: env::var("FIRECRAWL_API_KEY")
                .context("FIRECRAWL_API_KEY must be set")?,
            firecrawl_base_url: env::var("FIRECRAWL_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_FIRECRAWL_BASE_URL.to_string()),
            ai_gateway_api_key: non_empty_var("AI_GATEWAY_API_KEY"),
            ai_gateway_base_url: env::var("AI_GATEWAY_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_AI_GATEWAY_BASE_URL.to_string()),
            ai_extraction_model: env::var("AI_EXTRACTION_MODEL")
                .unwrap_or_else(|_| DEFAULT_AI_EXTRACTION_MODEL.to_string()),
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "supabase".to_string()),
            pms_encryption_key: non_empty_var("PMS_ENCRYPTION_KEY").map(SecretString::from),
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}
