use std::env;

use log::warn;
use thiserror::Error;

/// The default port the server will listen on.
pub const DEFAULT_PORT: u16 = 9050;

/// Used to sign tokens when no secret is configured. Anyone holding this
/// string can forge sessions, so running with it outside development is a
/// deployment mistake.
const FALLBACK_TOKEN_SECRET: &str = "velvet-insecure-dev-secret";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),
    #[error("invalid value for {var}: {message}")]
    Invalid { var: &'static str, message: String },
}

/// Process-wide configuration, built once at startup and read-only after.
/// Components receive it by reference and never read the environment
/// themselves.
#[derive(Debug, Clone)]
pub struct Config {
    /// Secret the session tokens are signed with
    pub token_secret: String,
    /// Postgres connection string
    pub database_url: String,
    /// Port the HTTP server listens on
    pub port: u16,
    pub storage: StorageConfig,
}

/// Connection details for the object-storage service uploads are proxied to.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Base URL of the storage API
    pub url: String,
    /// Service key sent with every storage request
    pub key: String,
    /// Bucket uploads are written into
    pub bucket: String,
    /// Prefix public object URLs are composed from
    pub public_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let token_secret = match env::var("VELVET_TOKEN_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                warn!("VELVET_TOKEN_SECRET is not set, sessions are signed with an insecure default");
                FALLBACK_TOKEN_SECRET.to_string()
            }
        };

        let port = match env::var("VELVET_SERVER_PORT") {
            Ok(port) => port.parse().map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
                var: "VELVET_SERVER_PORT",
                message: e.to_string(),
            })?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            token_secret,
            database_url: required("VELVET_DATABASE_URL")?,
            port,
            storage: StorageConfig {
                url: required("VELVET_STORAGE_URL")?,
                key: required("VELVET_STORAGE_KEY")?,
                bucket: required("VELVET_STORAGE_BUCKET")?,
                public_url: required("VELVET_STORAGE_PUBLIC_URL")?,
            },
        })
    }
}

fn required(var: &'static str) -> Result<String, ConfigError> {
    env::var(var).map_err(|_| ConfigError::MissingVar(var))
}
