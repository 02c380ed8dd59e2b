//! Process configuration from environment variables.

use std::env;

use conveyor_core::CoreConfig;
use thiserror::Error;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_WORKERS: usize = 4;
const DEFAULT_QUEUE_SIZE: usize = 64;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub core: CoreConfig,
}

impl Config {
    /// Reads `HTTP_SERVER_HOST`, `HTTP_SERVER_PORT`, `WORKERS` and
    /// `QUEUE_SIZE`, falling back to defaults when unset. A variable that is
    /// set but unparsable fails startup instead of silently defaulting.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("HTTP_SERVER_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: parse_env("HTTP_SERVER_PORT", DEFAULT_PORT)?,
            core: CoreConfig {
                workers: parse_env("WORKERS", DEFAULT_WORKERS)?,
                queue_capacity: parse_env("QUEUE_SIZE", DEFAULT_QUEUE_SIZE)?,
            },
        })
    }
}

fn parse_env<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key,
            message: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}
