use std::{env, fmt::Display, str::FromStr};

use anyhow::{anyhow, Context};
use tracing::{info, warn};

use crate::geocode::GoogleGeocoder;

pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub geocoding: Option<GeocodingSettings>,
    pub sessions: SessionSettings,
    pub cors_origin: Option<String>,
}

pub struct GeocodingSettings {
    pub api_key: String,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub secure: bool,
    pub inactivity_minutes: i64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            secure: false,
            inactivity_minutes: 60,
        }
    }
}

impl Config {
    /// Reads `.env` (when present) and then the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let geocoding = match lookup("GEOCODING_API_KEY") {
            Some(api_key) if !api_key.trim().is_empty() => Some(GeocodingSettings {
                api_key,
                url: or_default(&lookup, "GEOCODING_URL", GoogleGeocoder::DEFAULT_URL),
            }),
            _ => {
                warn!("GEOCODING_API_KEY not set, geocoding against the built-in place list");
                None
            }
        };

        let defaults = SessionSettings::default();
        let config = Self {
            database_url: or_default(&lookup, "DATABASE_URL", "sqlite://questboard.db?mode=rwc"),
            bind_addr: or_default(&lookup, "BIND_ADDR", "0.0.0.0:8080"),
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 16)?,
            geocoding,
            sessions: SessionSettings {
                secure: parse_or(&lookup, "SESSION_SECURE", defaults.secure)?,
                inactivity_minutes: parse_or(
                    &lookup,
                    "SESSION_INACTIVITY_MINUTES",
                    defaults.inactivity_minutes,
                )?,
            },
            cors_origin: lookup("CORS_ORIGIN"),
        };

        if config.db_max_connections == 0 {
            return Err(anyhow!("DB_MAX_CONNECTIONS must be at least 1"));
        }
        Ok(config)
    }
}

fn or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_owned()
    })
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr + Display,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid {key} value: {raw}")),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}
