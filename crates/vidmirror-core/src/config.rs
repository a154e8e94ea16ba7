//! Configuration module
//!
//! Configuration is read once at startup from the environment (with optional
//! `.env` support), validated, and injected into the gateway and orchestrator.
//! Nothing re-reads the environment mid-run.

use std::env;
use std::path::PathBuf;

const DEFAULT_STAGING_DIR: &str = "downloads";
const DEFAULT_KEY_PREFIX: &str = "downloads";

/// Connection settings for the object store.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Endpoint as `host:port`, e.g. `localhost:9000`.
    pub endpoint: String,
    /// Whether to use HTTPS.
    pub secure: bool,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    pub region: Option<String>,
}

impl StoreConfig {
    /// Full endpoint URL derived from the host:port and TLS flag.
    pub fn endpoint_url(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        format!("{}://{}", scheme, self.endpoint)
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub store: StoreConfig,
    /// Local staging directory for in-flight downloads.
    pub staging_dir: PathBuf,
    /// Key prefix under which artifact pairs are stored.
    pub key_prefix: String,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let required = [
            "MINIO_ENDPOINT",
            "MINIO_ACCESS_KEY",
            "MINIO_SECRET_KEY",
            "MINIO_BUCKET",
        ];
        let missing: Vec<&str> = required
            .iter()
            .copied()
            .filter(|var| env::var(var).map(|v| v.trim().is_empty()).unwrap_or(true))
            .collect();
        if !missing.is_empty() {
            return Err(anyhow::anyhow!(
                "Missing required environment variables: {}",
                missing.join(", ")
            ));
        }

        let secure = env::var("MINIO_SECURE")
            .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes" | "on"))
            .unwrap_or(false);

        let config = Config {
            store: StoreConfig {
                endpoint: env::var("MINIO_ENDPOINT")?,
                secure,
                access_key: env::var("MINIO_ACCESS_KEY")?,
                secret_key: env::var("MINIO_SECRET_KEY")?,
                bucket: env::var("MINIO_BUCKET")?,
                region: env::var("MINIO_REGION").ok().filter(|s| !s.is_empty()),
            },
            staging_dir: env::var("VIDMIRROR_STAGING_DIR")
                .unwrap_or_else(|_| DEFAULT_STAGING_DIR.to_string())
                .into(),
            key_prefix: env::var("VIDMIRROR_PREFIX")
                .unwrap_or_else(|_| DEFAULT_KEY_PREFIX.to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.store.endpoint.contains("://") {
            return Err(anyhow::anyhow!(
                "MINIO_ENDPOINT must be host:port without a scheme (use MINIO_SECURE for TLS)"
            ));
        }
        if self.key_prefix.trim_matches('/').is_empty() {
            return Err(anyhow::anyhow!("VIDMIRROR_PREFIX must not be empty"));
        }
        Ok(())
    }
}
