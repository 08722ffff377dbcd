//! Binary entry point: wires configuration, database, seeding, and the bot.

use dotenvy::dotenv;
use sea_orm::Database;
use std::{env, sync::Arc};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use yellowjack::errors::{Error, Result};
use yellowjack::{bot, config, core};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; non-fatal, env vars can be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load and validate the application configuration
    let app_config = config::load_app_configuration()
        .inspect_err(|e| error!("Failed to load application configuration: {e}"))?;
    info!("Application configuration loaded.");

    // 4. Connect to the database and create the schema
    let db = Database::connect(&app_config.database_url)
        .await
        .map_err(Error::from)
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    config::database::create_tables(&db)
        .await
        .inspect_err(|e| error!("Failed to create database tables: {e}"))?;

    // 5. Seed static reference data and the opening week if needed
    let seeded = core::tax::seed_bracket_schedule(&db, &app_config.tax_brackets).await?;
    if seeded > 0 {
        info!(brackets = seeded, "Seeded tax bracket schedule.");
    }
    core::week::ensure_opening_week(&db, &app_config.settings).await?;

    // 6. Run the bot; the token is read here, directly before use
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {e}"))
        .map_err(Error::EnvVar)?;

    bot::run_bot(token, Arc::new(app_config), db)
        .await
        .map_err(Error::from)?;

    Ok(())
}
