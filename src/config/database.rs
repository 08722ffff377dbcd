//! Database configuration module for the Yellowjack back-office.
//!
//! Handles `SQLite` connection and table creation using `SeaORM`. Tables are
//! generated from the entity definitions via `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs. On top of the generated
//! tables this module installs the one piece of schema the entities cannot
//! express: the partial unique index that lets the storage layer itself
//! enforce the "exactly one active week" invariant.

use crate::entities::{CleaningService, Sale, ScheduledFinalization, TaxBracket, User, Week};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema, Statement};

/// Gets the database URL from environment variable or returns default `SQLite` path.
pub fn get_database_url() -> Result<String> {
    Ok(std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://data/yellowjack.sqlite".to_string()))
}

/// Establishes a connection to the `SQLite` database using the `DATABASE_URL`
/// environment variable, falling back to a default local file.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url()?;
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates all database tables from the entity definitions, plus the partial
/// unique index over `weeks.is_active`. `SQLite` rejects a second row with
/// `is_active = 1`, so a race between two finalization attempts can never
/// commit two active weeks.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut week_table = schema.create_table_from_entity(Week);
    let mut sale_table = schema.create_table_from_entity(Sale);
    let mut cleaning_table = schema.create_table_from_entity(CleaningService);
    let mut user_table = schema.create_table_from_entity(User);
    let mut bracket_table = schema.create_table_from_entity(TaxBracket);
    let mut scheduled_table = schema.create_table_from_entity(ScheduledFinalization);

    db.execute(builder.build(week_table.if_not_exists())).await?;
    db.execute(builder.build(sale_table.if_not_exists())).await?;
    db.execute(builder.build(cleaning_table.if_not_exists()))
        .await?;
    db.execute(builder.build(user_table.if_not_exists())).await?;
    db.execute(builder.build(bracket_table.if_not_exists()))
        .await?;
    db.execute(builder.build(scheduled_table.if_not_exists()))
        .await?;

    // Partial unique index: at most one row may have is_active = 1
    db.execute(Statement::from_string(
        builder,
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_weeks_single_active \
         ON weeks (is_active) WHERE is_active = 1",
    ))
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::{week, WeekModel};
    use chrono::{NaiveDate, Utc};
    use sea_orm::{ActiveModelTrait, EntityTrait, QuerySelect, Set};

    fn active_week(number: i64) -> week::ActiveModel {
        let start = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        week::ActiveModel {
            week_number: Set(number),
            period_start: Set(start),
            period_end: Set(start + chrono::Days::new(6)),
            is_active: Set(true),
            is_finalized: Set(false),
            total_revenue: Set(0.0),
            total_sales_count: Set(0),
            total_cleaning_revenue: Set(0.0),
            total_cleaning_count: Set(0),
            tax_amount: Set(0.0),
            effective_tax_rate: Set(0.0),
            tax_breakdown: Set(None),
            tax_finalized: Set(false),
            created_by: Set(None),
            finalized_by: Set(None),
            created_at: Set(Utc::now()),
            finalized_at: Set(None),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Tables exist if we can query them
        let _: Vec<WeekModel> = Week::find().limit(1).all(&db).await?;
        let _: Vec<crate::entities::SaleModel> = Sale::find().limit(1).all(&db).await?;
        let _: Vec<crate::entities::CleaningServiceModel> =
            CleaningService::find().limit(1).all(&db).await?;
        let _: Vec<crate::entities::UserModel> = User::find().limit(1).all(&db).await?;
        let _: Vec<crate::entities::TaxBracketModel> = TaxBracket::find().limit(1).all(&db).await?;
        let _: Vec<crate::entities::ScheduledFinalizationModel> =
            ScheduledFinalization::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_single_active_index_rejects_second_active_week() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        active_week(1).insert(&db).await?;
        let second = active_week(2).insert(&db).await;
        assert!(second.is_err());

        Ok(())
    }

    #[tokio::test]
    async fn test_single_active_index_allows_inactive_rows() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        active_week(1).insert(&db).await?;

        // Closed weeks do not collide with the partial index
        let mut closed = active_week(2);
        closed.is_active = Set(false);
        closed.is_finalized = Set(true);
        closed.insert(&db).await?;

        let mut also_closed = active_week(3);
        also_closed.is_active = Set(false);
        also_closed.is_finalized = Set(true);
        also_closed.insert(&db).await?;

        Ok(())
    }
}
