use std::str::FromStr;

use thiserror::Error;

use crate::domain::OversellPolicy;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Runtime settings, read from the environment (and `.env`, if present).
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Mailbox size for each service channel.
    pub channel_buffer: usize,
    pub oversell_policy: OversellPolicy,
    pub seed_demo_catalog: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            channel_buffer: 100,
            oversell_policy: OversellPolicy::Reject,
            seed_demo_catalog: true,
        }
    }
}

fn parse<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
            value,
        }),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset keys take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let channel_buffer = parse("CHANNEL_BUFFER", lookup("CHANNEL_BUFFER"), defaults.channel_buffer)?;
        if channel_buffer == 0 {
            return Err(ConfigError::Invalid {
                key: "CHANNEL_BUFFER",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse("PORT", lookup("PORT"), defaults.port)?,
            channel_buffer,
            oversell_policy: parse("OVERSELL_POLICY", lookup("OVERSELL_POLICY"), defaults.oversell_policy)?,
            seed_demo_catalog: parse("SEED_DEMO_CATALOG", lookup("SEED_DEMO_CATALOG"), defaults.seed_demo_catalog)?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
