//! Configuration management for the Yellowjack back-office.

/// Database configuration and connection management
pub mod database;

/// Ledger settings and tax bracket schedule from config.toml
pub mod ledger;

use crate::errors::{Error, Result};

pub use ledger::{BracketConfig, LedgerSettings, OpeningWeek};

/// Fully loaded application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Database URL (from `DATABASE_URL` or the default local file)
    pub database_url: String,
    /// Ledger-wide settings from config.toml
    pub settings: LedgerSettings,
    /// Validated tax bracket schedule from config.toml
    pub tax_brackets: Vec<BracketConfig>,
    /// Discord channel for finalization notices, from `YELLOWJACK_NOTIFY_CHANNEL`
    pub notify_channel: Option<u64>,
}

/// Loads and validates the full application configuration.
///
/// The config file path defaults to `./config.toml` and can be overridden
/// with the `YELLOWJACK_CONFIG` environment variable. The bracket schedule is
/// validated here so the resolver never sees overlapping or gapped brackets.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path =
        std::env::var("YELLOWJACK_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    let config = ledger::load_config(&path)?;
    ledger::validate_brackets(&config.tax_brackets)?;

    let notify_channel = match std::env::var("YELLOWJACK_NOTIFY_CHANNEL") {
        Ok(raw) => Some(raw.parse::<u64>().map_err(|e| Error::Config {
            message: format!("YELLOWJACK_NOTIFY_CHANNEL is not a channel id: {e}"),
        })?),
        Err(_) => None,
    };

    Ok(AppConfig {
        database_url: database::get_database_url()?,
        settings: config.ledger,
        tax_brackets: config.tax_brackets,
        notify_channel,
    })
}
