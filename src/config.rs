//! Service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string (unset: in-memory stores)
//! - `ADMIN_TOKEN` - Admin shared secret (default: development token)
//! - `EXTERNAL_FEED_URL` - External product feed base URL (default: <https://fakestoreapi.com>)
//! - `EXTERNAL_FEED_TIMEOUT_SECS` - Feed request timeout (default: 5)
//! - `NATS_URL` - NATS server for domain events (unset: events disabled)
//! - `HOST` - Bind address (default: 0.0.0.0)
//! - `PORT` - Listen port (default: 8083)
//! - `SEED_CATALOG` - Seed demo products into an empty local store (default: false)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

/// Development fallback for `ADMIN_TOKEN`.
pub const DEFAULT_ADMIN_TOKEN: &str = "supersecretadmintoken";
const DEFAULT_FEED_URL: &str = "https://fakestoreapi.com";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    Invalid(&'static str, String),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: Option<SecretString>,
    pub admin_token: SecretString,
    pub feed_url: Url,
    pub feed_timeout: Duration,
    pub nats_url: Option<String>,
    pub host: IpAddr,
    pub port: u16,
    pub seed_catalog: bool,
}

impl AppConfig {
    /// Loads `.env` if present, then reads the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` when a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let feed_url = get("EXTERNAL_FEED_URL").unwrap_or_else(|| DEFAULT_FEED_URL.to_string());
        let feed_url = Url::parse(&feed_url).map_err(|e| ConfigError::Invalid("EXTERNAL_FEED_URL", e.to_string()))?;

        Ok(Self {
            database_url: get("DATABASE_URL").map(SecretString::from),
            admin_token: SecretString::from(get("ADMIN_TOKEN").unwrap_or_else(|| DEFAULT_ADMIN_TOKEN.to_string())),
            feed_url,
            feed_timeout: Duration::from_secs(parse_or("EXTERNAL_FEED_TIMEOUT_SECS", get("EXTERNAL_FEED_TIMEOUT_SECS"), 5)?),
            nats_url: get("NATS_URL"),
            host: parse_or("HOST", get("HOST"), IpAddr::V4(Ipv4Addr::UNSPECIFIED))?,
            port: parse_or("PORT", get("PORT"), 8083)?,
            seed_catalog: match get("SEED_CATALOG") {
                None => false,
                Some(v) => parse_bool(&v).ok_or_else(|| ConfigError::Invalid("SEED_CATALOG", v))?,
            },
        })
    }

    pub fn socket_addr(&self) -> SocketAddr { SocketAddr::new(self.host, self.port) }

    pub fn uses_default_admin_token(&self) -> bool { self.admin_token.expose_secret() == DEFAULT_ADMIN_TOKEN }
}

fn parse_or<T>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(v) => v.parse().map_err(|e: T::Err| ConfigError::Invalid(key, e.to_string())),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
