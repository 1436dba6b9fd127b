// Info channel commands - list, remove and tune registered channels

use poise::serenity_prelude as serenity;
use std::collections::HashSet;
use tracing::info;

use crate::utils::config::colors;
use crate::utils::store::ConfigStore;
use crate::{Context, Error};

pub const LISTING_TITLE: &str = "Allowed channels for !info";
pub const UNRESTRICTED: &str = "All channels are allowed (no restriction configured)";

/// What `/infochannels` shows for a guild
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelListing {
    pub description: String,
    /// Only reported when channels are registered
    pub cooldown: Option<u64>,
}

impl ChannelListing {
    pub fn to_embed(&self) -> serenity::CreateEmbed {
        let embed = serenity::CreateEmbed::new()
            .title(LISTING_TITLE)
            .description(&self.description)
            .color(colors::INFO);

        match self.cooldown {
            Some(secs) => embed.footer(serenity::CreateEmbedFooter::new(format!(
                "Current cooldown: {} seconds",
                secs
            ))),
            None => embed,
        }
    }
}

/// Build the listing; `is_known` says whether a channel still exists in the guild
pub fn describe_info_channels(
    store: &ConfigStore,
    guild_id: &str,
    is_known: impl Fn(&str) -> bool,
) -> ChannelListing {
    let channels = store.info_channels(guild_id);
    if channels.is_empty() {
        return ChannelListing {
            description: UNRESTRICTED.to_string(),
            cooldown: None,
        };
    }

    let lines: Vec<String> = channels
        .iter()
        .map(|id| {
            if is_known(id) {
                format!("• <#{}>", id)
            } else {
                format!("• ID: {}", id)
            }
        })
        .collect();

    ChannelListing {
        description: lines.join("\n"),
        cooldown: Some(store.effective_cooldown(guild_id)),
    }
}

/// List allowed channels
#[poise::command(slash_command, prefix_command, guild_only)]
pub async fn infochannels(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = match ctx.guild_id() {
        Some(id) => id.to_string(),
        None => {
            ctx.say("This command can only be used in a server.").await?;
            return Ok(());
        }
    };

    let known: HashSet<u64> = ctx
        .guild()
        .map(|guild| guild.channels.keys().map(|id| id.get()).collect())
        .unwrap_or_default();

    let listing = {
        let store = ctx.data().store.lock().await;
        describe_info_channels(&store, &guild_id, |id| {
            id.parse::<u64>().is_ok_and(|id| known.contains(&id))
        })
    };

    ctx.send(poise::CreateReply::default().embed(listing.to_embed()))
        .await?;

    Ok(())
}

/// Stop sending the info embed to a channel
#[poise::command(
    slash_command,
    guild_only,
    required_permissions = "MANAGE_GUILD",
    default_member_permissions = "MANAGE_GUILD"
)]
pub async fn removeinfochannel(
    ctx: Context<'_>,
    #[description = "Channel to remove"] channel: serenity::GuildChannel,
) -> Result<(), Error> {
    let guild_id = match ctx.guild_id() {
        Some(id) => id.to_string(),
        None => {
            ctx.say("This command can only be used in a server.").await?;
            return Ok(());
        }
    };

    let channel_id = channel.id.to_string();
    let removed = {
        let mut store = ctx.data().store.lock().await;
        store.unregister_channel(&guild_id, &channel_id)?
    };

    let content = if removed {
        info!("Removed info channel {} for guild {}", channel_id, guild_id);
        format!("✅ <#{}> is no longer an info channel.", channel_id)
    } else {
        format!("<#{}> was not registered.", channel_id)
    };

    ctx.send(poise::CreateReply::default().content(content).ephemeral(true))
        .await?;

    Ok(())
}

/// Set the cooldown for this server
#[poise::command(
    slash_command,
    guild_only,
    required_permissions = "MANAGE_GUILD",
    default_member_permissions = "MANAGE_GUILD"
)]
pub async fn cooldown(
    ctx: Context<'_>,
    #[description = "Cooldown in seconds"]
    #[max = 86400]
    seconds: u64,
) -> Result<(), Error> {
    let guild_id = match ctx.guild_id() {
        Some(id) => id.to_string(),
        None => {
            ctx.say("This command can only be used in a server.").await?;
            return Ok(());
        }
    };

    {
        let mut store = ctx.data().store.lock().await;
        store.set_cooldown(&guild_id, seconds)?;
    }
    info!("Set cooldown for guild {} to {}s", guild_id, seconds);

    let embed = serenity::CreateEmbed::new()
        .title("Configuration Updated")
        .description(format!("Cooldown set to **{}** seconds", seconds))
        .color(colors::SUCCESS);
    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn empty_store(dir: &TempDir) -> ConfigStore {
        ConfigStore::load(dir.path().join("info_channels.json")).unwrap()
    }

    #[test]
    fn test_unknown_guild_is_unrestricted() {
        let dir = TempDir::new().unwrap();
        let listing = describe_info_channels(&empty_store(&dir), "100", |_| true);

        assert_eq!(listing.description, UNRESTRICTED);
        assert_eq!(listing.cooldown, None);
    }

    #[test]
    fn test_registered_channel_is_listed() {
        let dir = TempDir::new().unwrap();
        let mut store = empty_store(&dir);
        store.register_channel("100", "200").unwrap();

        let listing = describe_info_channels(&store, "100", |_| true);
        assert!(listing.description.contains("<#200>"));
        assert_eq!(listing.cooldown, Some(5));
    }

    #[test]
    fn test_deleted_channel_falls_back_to_id() {
        let dir = TempDir::new().unwrap();
        let mut store = empty_store(&dir);
        store.register_channel("100", "200").unwrap();
        store.register_channel("100", "300").unwrap();

        let listing = describe_info_channels(&store, "100", |id| id == "200");
        assert_eq!(listing.description, "• <#200>\n• ID: 300");
    }

    #[test]
    fn test_emptied_guild_is_unrestricted() {
        let dir = TempDir::new().unwrap();
        let mut store = empty_store(&dir);
        store.register_channel("100", "200").unwrap();
        store.unregister_channel("100", "200").unwrap();

        let listing = describe_info_channels(&store, "100", |_| true);
        assert_eq!(listing.description, UNRESTRICTED);
    }

    #[test]
    fn test_embed_footer_shows_cooldown() {
        let listing = ChannelListing {
            description: "• <#200>".into(),
            cooldown: Some(30),
        };
        let embed = serde_json::to_value(listing.to_embed()).unwrap();
        assert_eq!(embed["title"], LISTING_TITLE);
        assert_eq!(embed["footer"]["text"], "Current cooldown: 30 seconds");

        let bare = ChannelListing {
            description: UNRESTRICTED.into(),
            cooldown: None,
        };
        let embed = serde_json::to_value(bare.to_embed()).unwrap();
        assert!(embed["footer"].is_null());
    }
}
