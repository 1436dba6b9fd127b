// Per-guild slash command sync

use poise::serenity_prelude as serenity;
use std::fmt::Display;
use std::future::Future;
use tracing::{error, info, warn};

use crate::{Data, Error};

/// Outcome of applying an operation to every guild
#[derive(Debug, Default)]
pub struct SyncReport {
    pub synced: usize,
    pub failed: Vec<(serenity::GuildId, String)>,
}

/// Run `op` for each guild; a failure is recorded and the loop moves on
pub async fn for_each_guild<I, F, Fut, E>(guilds: I, mut op: F) -> SyncReport
where
    I: IntoIterator<Item = serenity::GuildId>,
    F: FnMut(serenity::GuildId) -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: Display,
{
    let mut report = SyncReport::default();
    for guild_id in guilds {
        match op(guild_id).await {
            Ok(()) => report.synced += 1,
            Err(e) => report.failed.push((guild_id, e.to_string())),
        }
    }
    report
}

/// Owned guild IDs from a `Ready` payload
pub fn guild_ids(guilds: &[serenity::UnavailableGuild]) -> Vec<serenity::GuildId> {
    guilds.iter().map(|g| g.id).collect()
}

/// Register the command table in every guild the bot is in
pub async fn sync_commands(
    ctx: &serenity::Context,
    commands: &[poise::Command<Data, Error>],
    guilds: &[serenity::GuildId],
) -> SyncReport {
    let report = for_each_guild(guilds.iter().copied(), |guild_id| async move {
        poise::builtins::register_in_guild(ctx, commands, guild_id).await?;
        info!("🔄 Synced slash commands for guild {}", guild_id);
        Ok::<_, serenity::Error>(())
    })
    .await;

    for (guild_id, reason) in &report.failed {
        error!("❌ Failed to sync in guild {}: {}", guild_id, reason);
    }
    if report.failed.is_empty() {
        info!("Commands synced in {} guild(s)", report.synced);
    } else {
        warn!(
            "Commands synced in {} guild(s), {} failed",
            report.synced,
            report.failed.len()
        );
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u64]) -> Vec<serenity::GuildId> {
        raw.iter().map(|&id| serenity::GuildId::new(id)).collect()
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_the_loop() {
        let mut seen = Vec::new();
        let report = for_each_guild(ids(&[1, 2, 3, 4]), |guild_id| {
            seen.push(guild_id.get());
            async move {
                if guild_id.get() % 2 == 0 {
                    Err(format!("missing access in {}", guild_id))
                } else {
                    Ok(())
                }
            }
        })
        .await;

        assert_eq!(seen, vec![1, 2, 3, 4]);
        assert_eq!(report.synced, 2);
        assert_eq!(report.failed.len(), 2);
        assert_eq!(report.failed[0], (serenity::GuildId::new(2), "missing access in 2".to_string()));
    }

    #[test]
    fn test_guild_ids_from_ready() {
        let guilds: Vec<serenity::UnavailableGuild> = serde_json::from_value(serde_json::json!([
            { "id": "10", "unavailable": true },
            { "id": "20", "unavailable": false },
        ]))
        .unwrap();

        assert_eq!(guild_ids(&guilds), ids(&[10, 20]));
    }

    #[tokio::test]
    async fn test_no_guilds() {
        let report = for_each_guild(ids(&[]), |_| async { Ok::<_, String>(()) }).await;
        assert_eq!(report.synced, 0);
        assert!(report.failed.is_empty());
    }
}
