//! Configuration module
//!
//! Runtime settings for the HTTP server, the Postgres pool and the storage backend.
//! Everything is read from the process environment (optionally seeded from `.env`).

use std::env;

use crate::storage_types::StorageBackend;

const DEFAULT_PORT: u16 = 4000;
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MAX_UPLOAD_SIZE_MB: usize = 100;
const STORAGE_PUT_TIMEOUT_SECS: u64 = 60;
const HTTP_CONCURRENCY_LIMIT: usize = 256;
const DEFAULT_KEY_PREFIX: &str = "uploads";
const DEFAULT_S3_REGION: &str = "us-east-1";

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    server_port: u16,
    environment: String,
    cors_origins: Vec<String>,
    database_url: String,
    db_max_connections: u32,
    db_timeout_seconds: u64,
    // Storage configuration
    storage_backend: StorageBackend,
    s3_bucket: Option<String>,
    s3_region: String,
    s3_endpoint: Option<String>, // S3-compatible providers (MinIO, DigitalOcean Spaces, ...)
    local_storage_path: Option<String>,
    local_storage_base_url: Option<String>,
    storage_key_prefix: String,
    storage_put_timeout_secs: u64,
    // HTTP limits
    max_upload_size_bytes: usize,
    http_concurrency_limit: usize,
    log_format: String,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup. `from_env` delegates here.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins_str = lookup("CORS_ORIGINS").unwrap_or_else(|| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let storage_backend = match lookup("STORAGE_BACKEND") {
            Some(value) => value.parse::<StorageBackend>()?,
            None => StorageBackend::S3,
        };

        let max_upload_size_mb = lookup("MAX_UPLOAD_SIZE_MB")
            .unwrap_or_else(|| MAX_UPLOAD_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_UPLOAD_SIZE_MB);

        let config = Config {
            server_port: lookup("PORT")
                .unwrap_or_else(|| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            cors_origins,
            database_url: lookup("DATABASE_URL")
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_max_connections: lookup("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: lookup("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            storage_backend,
            s3_bucket: lookup("S3_BUCKET"),
            s3_region: lookup("S3_REGION")
                .or_else(|| lookup("AWS_REGION"))
                .unwrap_or_else(|| DEFAULT_S3_REGION.to_string()),
            s3_endpoint: lookup("S3_ENDPOINT"),
            local_storage_path: lookup("LOCAL_STORAGE_PATH"),
            local_storage_base_url: lookup("LOCAL_STORAGE_BASE_URL"),
            storage_key_prefix: lookup("STORAGE_KEY_PREFIX")
                .map(|p| p.trim_matches('/').to_string())
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| DEFAULT_KEY_PREFIX.to_string()),
            storage_put_timeout_secs: lookup("STORAGE_PUT_TIMEOUT_SECS")
                .unwrap_or_else(|| STORAGE_PUT_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(STORAGE_PUT_TIMEOUT_SECS),
            max_upload_size_bytes: max_upload_size_mb * 1024 * 1024,
            http_concurrency_limit: lookup("HTTP_CONCURRENCY_LIMIT")
                .unwrap_or_else(|| HTTP_CONCURRENCY_LIMIT.to_string())
                .parse()
                .unwrap_or(HTTP_CONCURRENCY_LIMIT),
            log_format: lookup("LOG_FORMAT")
                .unwrap_or_else(|| "compact".to_string())
                .to_lowercase(),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(self.database_url.starts_with("postgresql://")
            || self.database_url.starts_with("postgres://"))
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.storage_put_timeout_secs == 0 {
            return Err(anyhow::anyhow!(
                "STORAGE_PUT_TIMEOUT_SECS must be greater than 0"
            ));
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.cors_origins
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.db_timeout_seconds
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> &str {
        &self.s3_region
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.s3_endpoint.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.local_storage_base_url.as_deref()
    }

    pub fn storage_key_prefix(&self) -> &str {
        &self.storage_key_prefix
    }

    pub fn storage_put_timeout_secs(&self) -> u64 {
        self.storage_put_timeout_secs
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.max_upload_size_bytes
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.http_concurrency_limit
    }

    pub fn log_format(&self) -> &str {
        &self.log_format
    }
}
