// Conzada Bot
// Rotating status, info channel registration and a health check for managed hosting

mod commands;
mod features;
mod models;
mod utils;

use std::env;

use poise::serenity_prelude as serenity;
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::features::presence::{PresenceSettings, StartOnce};
use crate::utils::bot_name::{display_tag, BotName};
use crate::utils::config::{colors, BotConfig};
use crate::utils::store::ConfigStore;

/// User data shared across all commands
#[derive(Debug)]
pub struct Data {
    pub store: Mutex<ConfigStore>,
    pub bot_name: BotName,
    pub presence: PresenceSettings,
    pub presence_started: StartOnce,
}

type Error = Box<dyn std::error::Error + Send + Sync>;
type Context<'a> = poise::Context<'a, Data, Error>;

/// Register all commands
fn get_commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        commands::setup::setup(),
        commands::info_channels::infochannels(),
        commands::info_channels::removeinfochannel(),
        commands::info_channels::cooldown(),
    ]
}

async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    if let serenity::FullEvent::Ready { data_about_bot } = event {
        let name = display_tag(&data_about_bot.user.name, data_about_bot.user.discriminator);
        data.bot_name.set(name.clone());
        info!("🔗 Connected as {}", name);
        info!("🌐 Serving {} servers", data_about_bot.guilds.len());

        if data.presence_started.try_start() {
            tokio::spawn(features::presence::run(ctx.clone(), data.presence));
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "conzada_bot=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = BotConfig::from_env()?;
    let store = ConfigStore::load(&config.config_file)?;
    info!(
        "Loaded info channels for {} guild(s) from {}",
        store.document().servers.len(),
        store.path().display()
    );

    info!("Starting Conzada Bot...");

    let bot_name = BotName::default();
    if config.hosted {
        // Detached; it dies with the process
        features::health::spawn(config.port, bot_name.clone())?;
    }

    let presence = PresenceSettings {
        guild_id: serenity::GuildId::new(config.presence_guild_id),
        interval: config.status_interval,
    };

    // Setup framework
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: get_commands(),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some("!".into()),
                ..Default::default()
            },
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            on_error: |error| {
                Box::pin(async move {
                    match error {
                        poise::FrameworkError::Command { error, ctx, .. } => {
                            error!("Command {} failed: {:?}", ctx.command().name, error);
                            let embed = serenity::CreateEmbed::new()
                                .description(format!("❌ Error: {}", error))
                                .color(colors::ERROR);
                            let _ = ctx
                                .send(poise::CreateReply::default().embed(embed).ephemeral(true))
                                .await;
                        }
                        err => {
                            if let Err(e) = poise::builtins::on_error(err).await {
                                error!("Error while handling error: {:?}", e);
                            }
                        }
                    }
                })
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Bot is ready! Syncing commands...");
                let guilds = features::command_sync::guild_ids(&ready.guilds);
                features::command_sync::sync_commands(ctx, &framework.options().commands, &guilds)
                    .await;

                Ok(Data {
                    store: Mutex::new(store),
                    bot_name,
                    presence,
                    presence_started: StartOnce::default(),
                })
            })
        })
        .build();

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT
        | serenity::GatewayIntents::GUILD_PRESENCES;
    // No GUILD_MEMBERS: the status member count only sees members sent with presence data

    let mut client = serenity::ClientBuilder::new(&config.token, intents)
        .framework(framework)
        .await?;

    // Run with graceful shutdown
    let shard_manager = client.shard_manager.clone();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {:?}", e);
            return;
        }
        info!("Shutting down...");
        shard_manager.shutdown_all().await;
    });

    if let Err(why) = client.start().await {
        error!("Client error: {:?}", why);
        client.shard_manager.shutdown_all().await;
        return Err(why.into());
    }

    info!("Goodbye!");
    Ok(())
}
