use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cooldown applied when neither the guild nor the file says otherwise
pub const DEFAULT_COOLDOWN_SECS: u64 = 5;

/// Guild (Server) specific configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct GuildConfig {
    /// Channel IDs that receive the info embed, in registration order
    #[serde(default)]
    pub info_channels: Vec<String>,
    /// Per-guild settings
    #[serde(default)]
    pub config: GuildSettings,
}

/// Per-guild overrides
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct GuildSettings {
    /// Cooldown in seconds, falls back to `GlobalSettings::default_cooldown`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooldown: Option<u64>,
    /// Settings written by hand or by older versions, kept as-is
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GlobalSettings {
    pub default_cooldown: u64,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            default_cooldown: DEFAULT_COOLDOWN_SECS,
        }
    }
}

/// Root of `info_channels.json`
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ConfigDocument {
    /// Guild ID -> guild configuration
    #[serde(default)]
    pub servers: BTreeMap<String, GuildConfig>,
    #[serde(default)]
    pub global_settings: GlobalSettings,
}

impl ConfigDocument {
    /// Cooldown that applies to a guild
    pub fn effective_cooldown(&self, guild_id: &str) -> u64 {
        self.servers
            .get(guild_id)
            .and_then(|guild| guild.config.cooldown)
            .unwrap_or(self.global_settings.default_cooldown)
    }
}
