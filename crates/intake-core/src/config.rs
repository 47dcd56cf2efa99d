//! Configuration module
//!
//! Typed application configuration, loaded once at startup from the
//! environment (a `.env` file is honored when present).

use std::env;
use std::str::FromStr;

use crate::storage_types::SinkBackend;

const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MAX_FILE_SIZE_MB: usize = 20;
const MAX_REQUEST_BODY_MB: usize = 256;
const RATE_LIMIT_WINDOW_SECS: u64 = 900;
const RATE_LIMIT_MAX: u32 = 100;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    // Document sink configuration
    pub storage_backend: SinkBackend,
    pub local_storage_path: String,
    pub max_file_size_bytes: usize,
    pub max_request_body_bytes: usize,
    // Persistence constraints
    pub submission_email_unique: bool,
    // Rate limiting for the ingestion endpoint
    pub rate_limit_window_secs: u64,
    pub rate_limit_max: u32,
    pub trusted_proxy_count: usize,
    // Confirmation mail (fire-and-forget)
    pub mail_enabled: bool,
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_tls: bool,
    pub mail_from: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins: Vec<String> = env::var("CORS_ORIGINS")
            .or_else(|_| env::var("FRONTEND_ORIGIN"))
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let storage_backend = env::var("STORAGE_BACKEND")
            .ok()
            .map(|s| SinkBackend::from_str(&s))
            .transpose()?
            .unwrap_or(SinkBackend::Disk);

        let max_file_size_mb = env::var("MAX_FILE_SIZE_MB")
            .unwrap_or_else(|_| MAX_FILE_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_FILE_SIZE_MB);

        let max_request_body_mb = env::var("MAX_REQUEST_BODY_MB")
            .unwrap_or_else(|_| MAX_REQUEST_BODY_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_REQUEST_BODY_MB);

        let config = Config {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            storage_backend,
            local_storage_path: env::var("LOCAL_STORAGE_PATH")
                .unwrap_or_else(|_| "./uploads".to_string()),
            max_file_size_bytes: max_file_size_mb * 1024 * 1024,
            max_request_body_bytes: max_request_body_mb * 1024 * 1024,
            submission_email_unique: env_bool("SUBMISSION_EMAIL_UNIQUE", false),
            rate_limit_window_secs: env::var("RATE_LIMIT_WINDOW_SECS")
                .unwrap_or_else(|_| RATE_LIMIT_WINDOW_SECS.to_string())
                .parse()
                .unwrap_or(RATE_LIMIT_WINDOW_SECS),
            rate_limit_max: env::var("RATE_LIMIT_MAX")
                .unwrap_or_else(|_| RATE_LIMIT_MAX.to_string())
                .parse()
                .unwrap_or(RATE_LIMIT_MAX),
            trusted_proxy_count: env::var("TRUSTED_PROXY_COUNT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1),
            mail_enabled: env_bool("MAIL_ENABLED", false),
            smtp_host: env::var("SMTP_HOST").ok(),
            smtp_port: env::var("SMTP_PORT").ok().and_then(|s| s.parse().ok()),
            smtp_user: env::var("SMTP_USER").ok(),
            smtp_password: env::var("SMTP_PASSWORD").ok(),
            smtp_tls: env_bool("SMTP_TLS", true),
            mail_from: env::var("MAIL_FROM").ok(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Fail fast on configurations that cannot serve requests.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }
        if self.max_request_body_bytes < self.max_file_size_bytes {
            return Err(anyhow::anyhow!(
                "MAX_REQUEST_BODY_MB must be at least MAX_FILE_SIZE_MB"
            ));
        }
        if self.storage_backend == SinkBackend::Disk && self.local_storage_path.trim().is_empty() {
            return Err(anyhow::anyhow!(
                "LOCAL_STORAGE_PATH must be set for the disk storage backend"
            ));
        }
        if self.mail_enabled && (self.smtp_host.is_none() || self.mail_from.is_none()) {
            return Err(anyhow::anyhow!(
                "SMTP_HOST and MAIL_FROM must be set when MAIL_ENABLED=true"
            ));
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}

fn env_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            server_host: "0.0.0.0".to_string(),
            server_port: 5000,
            cors_origins: vec!["*".to_string()],
            environment: "development".to_string(),
            database_url: "postgresql://localhost/intake".to_string(),
            db_max_connections: MAX_CONNECTIONS,
            db_timeout_seconds: CONNECTION_TIMEOUT_SECS,
            storage_backend: SinkBackend::Disk,
            local_storage_path: "./uploads".to_string(),
            max_file_size_bytes: MAX_FILE_SIZE_MB * 1024 * 1024,
            max_request_body_bytes: MAX_REQUEST_BODY_MB * 1024 * 1024,
            submission_email_unique: false,
            rate_limit_window_secs: RATE_LIMIT_WINDOW_SECS,
            rate_limit_max: RATE_LIMIT_MAX,
            trusted_proxy_count: 1,
            mail_enabled: false,
            smtp_host: None,
            smtp_port: None,
            smtp_user: None,
            smtp_password: None,
            smtp_tls: true,
            mail_from: None,
        }
    }

    #[test]
    fn validate_accepts_defaults() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn validate_rejects_mail_without_smtp() {
        let mut config = base_config();
        config.mail_enabled = true;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_body_limit_below_file_limit() {
        let mut config = base_config();
        config.max_request_body_bytes = config.max_file_size_bytes - 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn production_detection() {
        let mut config = base_config();
        assert!(!config.is_production());
        config.environment = "Production".to_string();
        assert!(config.is_production());
    }
}
