// Centralized configuration for Conzada Bot

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Guild whose members are counted for the status message
pub const DEFAULT_PRESENCE_GUILD_ID: u64 = 1399923106075771022;
pub const DEFAULT_PORT: u16 = 10000;
pub const DEFAULT_STATUS_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_CONFIG_FILE: &str = "info_channels.json";

/// Welcome embed sent by `/setup`
pub mod welcome {
    pub const TITLE: &str = "Welcome to Conzada!";
    pub const DESCRIPTION: &str = "Your secure solution for premium services.";
    pub const FOOTER: &str = "Thank you for choosing us!";
}

/// Discord embed colors
pub mod colors {
    pub const SUCCESS: u32 = 0x2ecc71;
    pub const ERROR: u32 = 0xff0000;
    pub const INFO: u32 = 0x3498db;
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("TOKEN must be set to the bot token")]
    MissingToken,
    #[error("PORT must be a port number, got {0:?}")]
    InvalidPort(String),
    #[error("STATUS_INTERVAL_SECS must be a positive number of seconds, got {0:?}")]
    InvalidInterval(String),
    #[error("PRESENCE_GUILD_ID must be a guild ID, got {0:?}")]
    InvalidGuildId(String),
}

/// Runtime settings read from the environment
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub token: String,
    pub port: u16,
    /// Set when running on a managed host that probes `GET /`
    pub hosted: bool,
    pub presence_guild_id: u64,
    pub status_interval: Duration,
    pub config_file: PathBuf,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let token = get("TOKEN").ok_or(ConfigError::MissingToken)?;

        let port = match get("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let presence_guild_id = match get("PRESENCE_GUILD_ID") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(id) if id != 0 => id,
                _ => return Err(ConfigError::InvalidGuildId(raw)),
            },
            None => DEFAULT_PRESENCE_GUILD_ID,
        };

        let interval_secs = match get("STATUS_INTERVAL_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => return Err(ConfigError::InvalidInterval(raw)),
            },
            None => DEFAULT_STATUS_INTERVAL_SECS,
        };

        Ok(Self {
            token,
            port,
            hosted: get("RENDER").is_some(),
            presence_guild_id,
            status_interval: Duration::from_secs(interval_secs),
            config_file: get("INFO_CHANNELS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE)),
        })
    }
}
