// Setup command - register an info channel and post the welcome embed

use poise::serenity_prelude as serenity;
use tracing::{debug, info};

use crate::utils::config::{colors, welcome};
use crate::{Context, Error};

pub fn welcome_embed() -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(welcome::TITLE)
        .description(welcome::DESCRIPTION)
        .color(colors::SUCCESS)
        .footer(serenity::CreateEmbedFooter::new(welcome::FOOTER))
}

/// Choose a channel to send the info embed to
#[poise::command(
    slash_command,
    guild_only,
    required_permissions = "MANAGE_GUILD",
    default_member_permissions = "MANAGE_GUILD"
)]
pub async fn setup(
    ctx: Context<'_>,
    #[description = "Select the target channel"]
    #[channel_types("Text")]
    channel: serenity::GuildChannel,
) -> Result<(), Error> {
    let guild_id = match ctx.guild_id() {
        Some(id) => id.to_string(),
        None => {
            ctx.say("This command can only be used in a server.").await?;
            return Ok(());
        }
    };

    ctx.defer_ephemeral().await?;

    let channel_id = channel.id.to_string();
    let added = {
        let mut store = ctx.data().store.lock().await;
        store.register_channel(&guild_id, &channel_id)?
    };
    if added {
        info!("Registered info channel {} for guild {}", channel_id, guild_id);
    } else {
        debug!("Channel {} already registered for guild {}", channel_id, guild_id);
    }

    // Registration stays even if the bot can't post here
    channel
        .id
        .send_message(ctx.http(), serenity::CreateMessage::new().embed(welcome_embed()))
        .await?;

    ctx.send(
        poise::CreateReply::default()
            .content(format!("✅ Embed sent to <#{}>.", channel_id))
            .ephemeral(true),
    )
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_welcome_embed() {
        let embed = serde_json::to_value(welcome_embed()).unwrap();
        assert_eq!(embed["title"], "Welcome to Conzada!");
        assert_eq!(embed["description"], "Your secure solution for premium services.");
        assert_eq!(embed["footer"]["text"], "Thank you for choosing us!");
    }
}
