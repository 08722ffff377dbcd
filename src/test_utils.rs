//! Shared test utilities for the Yellowjack back-office.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    config::{BracketConfig, LedgerSettings},
    core::{auth, cleaning, sale, tax, week},
    entities,
    errors::Result,
};
use chrono::{Days, NaiveDate};
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Ledger settings used across tests: unit rate 60, the `test-employee`
/// identity excluded from cleaning counts, and `manager` as the privileged
/// role.
#[must_use]
pub fn test_settings() -> LedgerSettings {
    LedgerSettings {
        cleaning_unit_rate: 60.0,
        excluded_cleaning_identity: Some("test-employee".to_string()),
        privileged_role: "manager".to_string(),
        opening_week: None,
    }
}

/// The two-bracket reference schedule: 10% up to 500.00, 15% above.
#[must_use]
pub fn default_bracket_config() -> Vec<BracketConfig> {
    vec![
        BracketConfig {
            min_revenue: 0.0,
            max_revenue: Some(500.0),
            rate: 0.10,
        },
        BracketConfig {
            min_revenue: 500.01,
            max_revenue: None,
            rate: 0.15,
        },
    ]
}

/// Seeds the reference bracket schedule into the database.
pub async fn seed_default_brackets(db: &DatabaseConnection) -> Result<()> {
    tax::seed_bracket_schedule(db, &default_bracket_config()).await?;
    Ok(())
}

/// Sets up a test database with week #3 (2024-06-03 to 2024-06-09) open.
/// Returns (db, week) for common test scenarios.
pub async fn setup_with_week() -> Result<(DatabaseConnection, entities::week::Model)> {
    let db = setup_test_db().await?;
    let start = NaiveDate::from_ymd_opt(2024, 6, 3).expect("valid date");
    let opened = week::create_week(&db, 3, start, start + Days::new(6), None).await?;
    Ok((db, opened))
}

/// Records a sale with sensible defaults against the active week.
pub async fn create_test_sale(
    db: &DatabaseConnection,
    amount: f64,
) -> Result<entities::sale::Model> {
    sale::record_sale(db, amount, None, "test-bartender".to_string()).await
}

/// Logs a cleaning record against the active week.
pub async fn create_test_cleaning(
    db: &DatabaseConnection,
    employee_id: &str,
    cleaning_count: i64,
    status: &str,
) -> Result<entities::cleaning_service::Model> {
    cleaning::record_cleaning(db, employee_id.to_string(), cleaning_count, status).await
}

/// Creates a user with the given role and status.
pub async fn create_test_user(
    db: &DatabaseConnection,
    username: &str,
    role: &str,
    status: &str,
) -> Result<entities::user::Model> {
    auth::create_user(
        db,
        None,
        username.to_string(),
        role.to_string(),
        status.to_string(),
    )
    .await
}

/// Creates the standard privileged actor: an active manager named `sam`.
pub async fn create_manager(db: &DatabaseConnection) -> Result<entities::user::Model> {
    create_test_user(db, "sam", "manager", "active").await
}

/// Closes the given active week with a zeroed snapshot and opens the next
/// contiguous one. For tests that need several weeks without running the
/// full orchestrator.
pub async fn rotate_active_week(
    db: &DatabaseConnection,
    active: &entities::week::Model,
) -> Result<entities::week::Model> {
    let snapshot = week::WeekSnapshot {
        total_revenue: 0.0,
        total_sales_count: 0,
        total_cleaning_revenue: 0.0,
        total_cleaning_count: 0,
        tax_amount: 0.0,
        effective_tax_rate: 0.0,
        tax_breakdown: None,
    };
    week::close_active_week(db, active.clone(), "test-rotation", snapshot).await?;

    let next_start = active.period_end + Days::new(1);
    week::create_week(
        db,
        active.week_number + 1,
        next_start,
        next_start + Days::new(6),
        None,
    )
    .await
}

/// Drops a table outright, simulating a partially-migrated store.
pub async fn drop_table(db: &DatabaseConnection, table: &str) -> Result<()> {
    db.execute(Statement::from_string(
        db.get_database_backend(),
        format!("DROP TABLE {table}"),
    ))
    .await?;
    Ok(())
}
