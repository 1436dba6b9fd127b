// Presence updater - rotates the "Watching ..." status

use poise::serenity_prelude as serenity;
use rand::prelude::IndexedRandom;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy)]
pub struct PresenceSettings {
    /// Guild whose human members are counted
    pub guild_id: serenity::GuildId,
    pub interval: Duration,
}

/// Live numbers the status templates can show
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatusCounts {
    pub members: usize,
    pub guilds: usize,
}

/// Flips once so reconnect `Ready` events don't spawn a second loop
#[derive(Debug, Default)]
pub struct StartOnce(AtomicBool);

impl StartOnce {
    /// `true` only for the first caller
    pub fn try_start(&self) -> bool {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

pub fn candidate_statuses(counts: StatusCounts) -> Vec<String> {
    vec![
        format!("({}) members in Conzada", counts.members),
        format!(
            "Operating in {} servers — Trusted by communities",
            counts.guilds
        ),
        "Conzada.cc | Your Secure option for main accs".to_string(),
        "System Status: Safe".to_string(),
    ]
}

pub fn choose_status<'a, R: Rng + ?Sized>(candidates: &'a [String], rng: &mut R) -> Option<&'a str> {
    candidates.choose(rng).map(String::as_str)
}

fn current_counts(ctx: &serenity::Context, guild_id: serenity::GuildId) -> StatusCounts {
    let members = match ctx.cache.guild(guild_id) {
        Some(guild) => guild.members.values().filter(|m| !m.user.bot).count(),
        None => {
            debug!("Guild {} not in cache, counting 0 members", guild_id);
            0
        }
    };

    StatusCounts {
        members,
        guilds: ctx.cache.guild_count(),
    }
}

fn update_status(ctx: &serenity::Context, settings: &PresenceSettings) {
    let candidates = candidate_statuses(current_counts(ctx, settings.guild_id));
    let chosen = {
        let mut rng = rand::rng();
        choose_status(&candidates, &mut rng).map(str::to_string)
    };

    match chosen {
        Some(status) => {
            info!("🔄 Updating status to: {}", status.replace('\n', " / "));
            ctx.set_activity(Some(serenity::ActivityData::watching(status)));
        }
        None => warn!("⚠️ Status update skipped: no candidate statuses"),
    }
}

/// Update the status every `settings.interval`, forever
pub async fn run(ctx: serenity::Context, settings: PresenceSettings) {
    info!(
        "Presence loop started (every {}s, counting guild {})",
        settings.interval.as_secs(),
        settings.guild_id
    );

    let mut ticker = tokio::time::interval(settings.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        update_status(&ctx, &settings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_candidates_use_counts() {
        let statuses = candidate_statuses(StatusCounts { members: 12, guilds: 3 });
        assert_eq!(statuses.len(), 4);
        assert_eq!(statuses[0], "(12) members in Conzada");
        assert!(statuses[1].starts_with("Operating in 3 servers"));
    }

    #[test]
    fn test_choose_from_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(choose_status(&[], &mut rng), None);
    }

    #[test]
    fn test_choice_is_uniform() {
        let candidates = candidate_statuses(StatusCounts::default());
        let mut rng = StdRng::seed_from_u64(0xC0FFEE);
        let mut hits = vec![0usize; candidates.len()];

        let trials = 40_000;
        for _ in 0..trials {
            let chosen = choose_status(&candidates, &mut rng).unwrap();
            let idx = candidates.iter().position(|c| c == chosen).unwrap();
            hits[idx] += 1;
        }

        let expected = trials / candidates.len();
        for count in hits {
            // within 5% of 1/N
            assert!(count.abs_diff(expected) < expected / 20, "{count} vs {expected}");
        }
    }

    #[test]
    fn test_start_once() {
        let guard = StartOnce::default();
        assert!(guard.try_start());
        assert!(!guard.try_start());
        assert!(!guard.try_start());
    }
}
