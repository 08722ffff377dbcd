//! Week ledger - read/write access to the accounting week entity.
//!
//! The "current week" is not process state: it is the single row with
//! `is_active = true`, guarded by a partial unique index at the storage layer
//! and re-verified transactionally by the finalization orchestrator. Closing
//! a week only ever happens inside the orchestrator's transaction.

use crate::{
    config::LedgerSettings,
    core::stats,
    entities::{Week, week},
    errors::{Error, Result},
};
use chrono::{Days, NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Snapshot aggregates stamped onto a week when it is closed.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekSnapshot {
    /// Total revenue (sales + cleaning)
    pub total_revenue: f64,
    /// Number of sales
    pub total_sales_count: i64,
    /// Cleaning revenue
    pub total_cleaning_revenue: f64,
    /// Completed cleaning units
    pub total_cleaning_count: i64,
    /// Tax owed on the total revenue
    pub tax_amount: f64,
    /// Flat rate of the matched bracket
    pub effective_tax_rate: f64,
    /// JSON detail of the bracket application
    pub tax_breakdown: Option<String>,
}

/// Returns the single active week, or None when the ledger is closed.
pub async fn get_active_week<C>(db: &C) -> Result<Option<week::Model>>
where
    C: ConnectionTrait,
{
    Week::find()
        .filter(week::Column::IsActive.eq(true))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a week by primary key.
pub async fn get_week_by_id(db: &DatabaseConnection, week_id: i64) -> Result<Option<week::Model>> {
    Week::find_by_id(week_id).one(db).await.map_err(Into::into)
}

/// Finds a week by its accounting number.
pub async fn get_week_by_number(
    db: &DatabaseConnection,
    week_number: i64,
) -> Result<Option<week::Model>> {
    Week::find()
        .filter(week::Column::WeekNumber.eq(week_number))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists all weeks, newest first.
pub async fn list_weeks(db: &DatabaseConnection) -> Result<Vec<week::Model>> {
    Week::find()
        .order_by_desc(week::Column::WeekNumber)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates a new week in the active, unfinalized state.
///
/// Week number uniqueness and the single-active invariant are enforced by the
/// storage layer; an attempt to insert a second active week fails here with a
/// database error rather than committing corrupt state.
pub async fn create_week<C>(
    db: &C,
    week_number: i64,
    period_start: NaiveDate,
    period_end: NaiveDate,
    created_by: Option<String>,
) -> Result<week::Model>
where
    C: ConnectionTrait,
{
    if period_end < period_start {
        return Err(Error::InvalidPeriod {
            start: period_start,
            end: period_end,
        });
    }

    let new_week = week::ActiveModel {
        week_number: Set(week_number),
        period_start: Set(period_start),
        period_end: Set(period_end),
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
        created_by: Set(created_by),
        finalized_by: Set(None),
        created_at: Set(Utc::now()),
        finalized_at: Set(None),
        ..Default::default()
    };

    let result = new_week.insert(db).await?;
    Ok(result)
}

/// Closes a week: clears the active flag, marks it finalized, and freezes the
/// snapshot, tax, and audit fields. Only the finalization orchestrator calls
/// this, inside its transaction.
pub async fn close_active_week<C>(
    db: &C,
    active: week::Model,
    finalized_by: &str,
    snapshot: WeekSnapshot,
) -> Result<week::Model>
where
    C: ConnectionTrait,
{
    let mut model: week::ActiveModel = active.into();
    model.is_active = Set(false);
    model.is_finalized = Set(true);
    model.total_revenue = Set(snapshot.total_revenue);
    model.total_sales_count = Set(snapshot.total_sales_count);
    model.total_cleaning_revenue = Set(snapshot.total_cleaning_revenue);
    model.total_cleaning_count = Set(snapshot.total_cleaning_count);
    model.tax_amount = Set(snapshot.tax_amount);
    model.effective_tax_rate = Set(snapshot.effective_tax_rate);
    model.tax_breakdown = Set(snapshot.tax_breakdown);
    model.tax_finalized = Set(true);
    model.finalized_by = Set(Some(finalized_by.to_string()));
    model.finalized_at = Set(Some(Utc::now()));

    let closed = model.update(db).await?;
    Ok(closed)
}

/// Re-verifies the single-active invariant before the orchestrator commits.
pub async fn assert_single_active_week<C>(db: &C) -> Result<()>
where
    C: ConnectionTrait,
{
    let active_count = Week::find()
        .filter(week::Column::IsActive.eq(true))
        .count(db)
        .await?;

    if active_count == 1 {
        Ok(())
    } else {
        Err(Error::LedgerCorrupted { active_count })
    }
}

/// Recomputes and rewrites the snapshot aggregate columns of a week from its
/// live child records, without touching the finalization or tax flags. This
/// is the explicit recompute path for diagnosing stale snapshots.
pub async fn recompute_week_snapshot(
    db: &DatabaseConnection,
    settings: &LedgerSettings,
    week_id: i64,
) -> Result<week::Model> {
    let target = get_week_by_id(db, week_id)
        .await?
        .ok_or_else(|| Error::WeekNotFound {
            week: week_id.to_string(),
        })?;

    let statistics = stats::aggregate_week(db, settings, week_id).await?;

    let mut model: week::ActiveModel = target.into();
    model.total_revenue = Set(statistics.total_revenue());
    model.total_sales_count = Set(statistics.sales_count());
    model.total_cleaning_revenue = Set(statistics.cleaning_revenue());
    model.total_cleaning_count = Set(statistics.cleaning_count());

    let updated = model.update(db).await?;
    Ok(updated)
}

/// Opens the first week when the ledger is empty, using the configured
/// opening week or falling back to week 1 starting today. Returns None when
/// weeks already exist.
pub async fn ensure_opening_week(
    db: &DatabaseConnection,
    settings: &LedgerSettings,
) -> Result<Option<week::Model>> {
    let existing = Week::find().count(db).await?;
    if existing > 0 {
        return Ok(None);
    }

    let (week_number, period_start) = settings.opening_week.as_ref().map_or_else(
        || (1, Utc::now().date_naive()),
        |opening| (opening.week_number, opening.period_start),
    );
    let period_end = period_start + Days::new(6);

    let opened = create_week(db, week_number, period_start, period_end, None).await?;
    info!(
        week_number = opened.week_number,
        %period_start,
        "opened initial ledger week"
    );
    Ok(Some(opened))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_create_week_starts_active_and_unfinalized() -> Result<()> {
        let db = setup_test_db().await?;

        let created = create_week(
            &db,
            3,
            date(2024, 6, 3),
            date(2024, 6, 9),
            Some("sam".to_string()),
        )
        .await?;

        assert_eq!(created.week_number, 3);
        assert!(created.is_active);
        assert!(!created.is_finalized);
        assert!(!created.tax_finalized);
        assert_eq!(created.total_revenue, 0.0);
        assert_eq!(created.created_by.as_deref(), Some("sam"));
        assert!(created.finalized_at.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_create_week_rejects_inverted_period() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_week(&db, 1, date(2024, 6, 9), date(2024, 6, 3), None).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidPeriod { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_week_rejects_duplicate_number() -> Result<()> {
        let (db, week) = setup_with_week().await?;
        rotate_active_week(&db, &week).await?;

        // week_number is unique even though the original week is now closed
        let result = create_week(
            &db,
            week.week_number,
            date(2024, 7, 1),
            date(2024, 7, 7),
            None,
        )
        .await;
        assert!(result.is_err());

        Ok(())
    }

    #[tokio::test]
    async fn test_get_active_week() -> Result<()> {
        let db = setup_test_db().await?;
        assert!(get_active_week(&db).await?.is_none());

        let created = create_week(&db, 1, date(2024, 1, 1), date(2024, 1, 7), None).await?;
        assert_eq!(get_active_week(&db).await?, Some(created));

        Ok(())
    }

    #[tokio::test]
    async fn test_lookup_by_number_and_id() -> Result<()> {
        let (db, week) = setup_with_week().await?;

        assert_eq!(get_week_by_id(&db, week.id).await?, Some(week.clone()));
        assert_eq!(
            get_week_by_number(&db, week.week_number).await?,
            Some(week)
        );
        assert!(get_week_by_id(&db, 999).await?.is_none());
        assert!(get_week_by_number(&db, 999).await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_list_weeks_newest_first() -> Result<()> {
        let (db, week) = setup_with_week().await?;
        let second = rotate_active_week(&db, &week).await?;
        let third = rotate_active_week(&db, &second).await?;

        let weeks = list_weeks(&db).await?;
        let numbers: Vec<i64> = weeks.iter().map(|w| w.week_number).collect();
        assert_eq!(
            numbers,
            vec![third.week_number, second.week_number, week.week_number]
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_close_active_week_freezes_snapshot() -> Result<()> {
        let (db, week) = setup_with_week().await?;

        let snapshot = WeekSnapshot {
            total_revenue: 850.0,
            total_sales_count: 5,
            total_cleaning_revenue: 600.0,
            total_cleaning_count: 10,
            tax_amount: 127.5,
            effective_tax_rate: 0.15,
            tax_breakdown: Some("[]".to_string()),
        };

        let closed = close_active_week(&db, week, "sam", snapshot).await?;

        assert!(!closed.is_active);
        assert!(closed.is_finalized);
        assert!(closed.tax_finalized);
        assert_eq!(closed.total_revenue, 850.0);
        assert_eq!(closed.total_sales_count, 5);
        assert_eq!(closed.total_cleaning_revenue, 600.0);
        assert_eq!(closed.total_cleaning_count, 10);
        assert_eq!(closed.tax_amount, 127.5);
        assert_eq!(closed.effective_tax_rate, 0.15);
        assert_eq!(closed.finalized_by.as_deref(), Some("sam"));
        assert!(closed.finalized_at.is_some());

        assert!(get_active_week(&db).await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_assert_single_active_week() -> Result<()> {
        let db = setup_test_db().await?;

        // No active week is also a violation from the orchestrator's view
        let err = assert_single_active_week(&db).await.unwrap_err();
        assert!(matches!(err, Error::LedgerCorrupted { active_count: 0 }));

        create_week(&db, 1, date(2024, 1, 1), date(2024, 1, 7), None).await?;
        assert_single_active_week(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_recompute_week_snapshot_refreshes_totals_only() -> Result<()> {
        let (db, week) = setup_with_week().await?;
        let settings = test_settings();

        create_test_sale(&db, 120.0).await?;
        create_test_cleaning(&db, "emp-1", 2, crate::entities::cleaning_service::STATUS_COMPLETED)
            .await?;

        let refreshed = recompute_week_snapshot(&db, &settings, week.id).await?;

        assert_eq!(refreshed.total_sales_count, 1);
        assert_eq!(refreshed.total_revenue, 120.0 + 2.0 * 60.0);
        assert_eq!(refreshed.total_cleaning_count, 2);
        // Still open, tax untouched
        assert!(refreshed.is_active);
        assert!(!refreshed.is_finalized);
        assert!(!refreshed.tax_finalized);
        assert_eq!(refreshed.tax_amount, 0.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_recompute_unknown_week() -> Result<()> {
        let db = setup_test_db().await?;
        let settings = test_settings();

        let result = recompute_week_snapshot(&db, &settings, 42).await;
        assert!(matches!(result.unwrap_err(), Error::WeekNotFound { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_ensure_opening_week_from_config() -> Result<()> {
        let db = setup_test_db().await?;
        let mut settings = test_settings();
        settings.opening_week = Some(crate::config::OpeningWeek {
            week_number: 3,
            period_start: date(2024, 6, 3),
        });

        let opened = ensure_opening_week(&db, &settings).await?.unwrap();
        assert_eq!(opened.week_number, 3);
        assert_eq!(opened.period_start, date(2024, 6, 3));
        assert_eq!(opened.period_end, date(2024, 6, 9));
        assert!(opened.is_active);

        // Second call is a no-op once weeks exist
        assert!(ensure_opening_week(&db, &settings).await?.is_none());

        Ok(())
    }
}
