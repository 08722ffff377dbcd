//! Bot layer - Discord-specific interface for the back-office.
//!
//! The chat surface is strictly read-and-record: reporting queries and sales
//! or cleaning intake. Finalization is never triggered from a command; it
//! runs through the deferred-finalization poller (or the library API), and
//! the bot only announces committed results to the notification channel.

/// Discord command implementations (general, report, intake)
pub mod commands;
/// Finalization notices posted to the configured channel
pub mod notify;

use crate::{config::AppConfig, core::scheduled, errors};
use chrono::Utc;
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use std::{sync::Arc, time::Duration};
use tracing::{info, warn};

/// How often the deferred-finalization poller sweeps for due requests
const POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Shared data available to all bot commands.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Application configuration (ledger settings, notify channel)
    pub config: Arc<AppConfig>,
}

/// Type alias for the error type Poise will use
pub type Error = errors::Error;
/// Command context carrying [`BotData`]
pub type Context<'a> = poise::Context<'a, BotData, Error>;

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            tracing::error!("Failed to start bot: {error:?}");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            tracing::error!("Error in command `{}`: {error:?}", ctx.command().name);
            if let Err(e) = ctx.say(format!("An error occurred: {error}")).await {
                tracing::error!("Failed to send error message: {e}");
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                tracing::error!("Error while handling error: {e}");
            }
        }
    }
}

/// Spawns the best-effort poller that executes due finalization requests and
/// posts notices for committed ones. Notification failures are logged and
/// swallowed: the finalization has already committed and must not be
/// affected.
fn spawn_finalization_poller(
    database: DatabaseConnection,
    config: Arc<AppConfig>,
    http: Arc<serenity::Http>,
) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(POLL_INTERVAL);
        loop {
            ticker.tick().await;

            match scheduled::run_due_finalizations(&database, &config.settings, Utc::now()).await {
                Ok(reports) => {
                    let Some(channel) = config.notify_channel else {
                        continue;
                    };
                    let channel = serenity::ChannelId::new(channel);
                    for report in &reports {
                        if let Some(outcome) = &report.outcome {
                            notify::send_finalization_notice(&http, channel, outcome).await;
                        }
                    }
                }
                Err(err) => warn!(error = %err, "deferred finalization sweep failed"),
            }
        }
    });
}

/// Builds and runs the Discord bot until the client stops.
pub async fn run_bot(
    token: String,
    config: Arc<AppConfig>,
    database: DatabaseConnection,
) -> Result<(), serenity::Error> {
    let poller_db = database.clone();
    let poller_config = Arc::clone(&config);

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::ping(),
                commands::help(),
                commands::week(),
                commands::weeks(),
                commands::revenue(),
                commands::sale(),
                commands::cleaning(),
            ],
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;

                spawn_finalization_poller(poller_db, poller_config, Arc::clone(&ctx.http));

                Ok(BotData {
                    database,
                    config,
                })
            })
        })
        .build();

    let intents = serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::DIRECT_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::Client::builder(&token, intents)
        .framework(framework)
        .await?;

    client.start().await
}
