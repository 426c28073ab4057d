use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://shreesaikpd.com",
    "https://shreesaikpd.com",
    "https://www.shreesaikpd.com",
];

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub twilio_account_sid: String,
    pub twilio_auth_token: String,
    pub twilio_phone_number: String,
    pub google_client_id: String,
    pub upload_dir: PathBuf,
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "estate-server".to_string()),
            twilio_account_sid: env::var("TWILIO_ACCOUNT_SID")
                .context("TWILIO_ACCOUNT_SID must be set")?,
            twilio_auth_token: env::var("TWILIO_AUTH_TOKEN")
                .context("TWILIO_AUTH_TOKEN must be set")?,
            twilio_phone_number: env::var("TWILIO_PHONE_NUMBER")
                .context("TWILIO_PHONE_NUMBER must be set")?,
            google_client_id: env::var("GOOGLE_CLIENT_ID").unwrap_or_default(),
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./uploads")),
            allowed_origins: parse_origins(env::var("ALLOWED_ORIGINS").ok().as_deref()),
        })
    }
}

/// Comma-separated origin list; falls back to the production site origins.
fn parse_origins(raw: Option<&str>) -> Vec<String> {
    let parsed: Vec<String> = raw
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if parsed.is_empty() {
        DEFAULT_ALLOWED_ORIGINS.iter().map(|s| s.to_string()).collect()
    } else {
        parsed
    }
}

/// Mask a secret for logging, keeping the first four characters.
pub fn mask_secret(value: &str) -> String {
    if value.is_empty() {
        return "(empty)".to_string();
    }
    let shown: String = value.chars().take(4).collect();
    let hidden = value.chars().count().saturating_sub(4);
    format!("{}{} ({} chars)", shown, "*".repeat(hidden), value.chars().count())
}
