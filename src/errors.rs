//! Unified error types for the Yellowjack back-office.
//!
//! The variants map onto the failure classes of the ledger workflow:
//! authorization failures, finalization preconditions, persistence errors,
//! and configuration problems. Missing data sources during aggregation are
//! deliberately NOT an error; see [`crate::core::stats::SourceAggregate`].

use chrono::NaiveDate;
use thiserror::Error;

/// All errors produced by the Yellowjack core and bot layers.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file or environment problem
    #[error("Configuration error: {message}")]
    Config {
        /// Description of what went wrong
        message: String,
    },

    /// Actor lacks the privileged role required to finalize a week
    #[error("User '{actor}' is not authorized to finalize the ledger")]
    Unauthorized {
        /// Username of the rejected actor
        actor: String,
    },

    /// No week is currently open in the ledger
    #[error("No active week is open in the ledger")]
    NoActiveWeek,

    /// The targeted week has already been closed and finalized
    #[error("Week #{week_number} is already finalized")]
    WeekAlreadyFinalized {
        /// Week number of the already-closed week
        week_number: i64,
    },

    /// Week lookup by id or number found nothing
    #[error("Week '{week}' not found")]
    WeekNotFound {
        /// Identifier or number used for the lookup
        week: String,
    },

    /// A week period where the end date precedes the start date
    #[error("Invalid week period: {start} to {end}")]
    InvalidPeriod {
        /// Proposed period start
        start: NaiveDate,
        /// Proposed period end
        end: NaiveDate,
    },

    /// A monetary amount or count that is zero, negative, or non-finite
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected value
        amount: f64,
    },

    /// More or fewer than one active week observed inside a transaction
    #[error("Ledger invariant violated: {active_count} weeks marked active")]
    LedgerCorrupted {
        /// Number of rows with `is_active = true`
        active_count: u64,
    },

    /// Database error from `SeaORM`
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Serialization failure for the tax breakdown snapshot
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable error
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Serenity/Poise framework error
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

impl Error {
    /// True for errors that mean "the finalization precondition no longer
    /// holds" rather than "something broke". Callers can safely treat these
    /// as no-ops and re-read the ledger state.
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(self, Self::NoActiveWeek | Self::WeekAlreadyFinalized { .. })
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
