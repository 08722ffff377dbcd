//! Finalization orchestrator - the atomic close-and-roll-forward transition.
//!
//! One transaction closes the active week with its snapshot and tax, then
//! opens the next week. Any failure between those steps rolls the whole
//! transaction back: a closed-but-no-new-week state is never observable. The
//! active week is read inside the transaction and the single-active invariant
//! is re-verified before commit, so two racing finalization attempts cannot
//! both succeed; the loser gets a precondition error.

use crate::{
    config::LedgerSettings,
    core::{auth, stats, tax, week},
    entities::{user, week as week_entity},
    errors::{Error, Result},
};
use chrono::{Days, NaiveDate};
use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::{error, info};

/// The two weeks touched by a successful finalization.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalizeOutcome {
    /// The week that was closed, with its frozen snapshot
    pub closed: week_entity::Model,
    /// The newly opened active week
    pub opened: week_entity::Model,
}

/// Structured result returned at the orchestrator boundary. Callers treat
/// `success == false` as "no change occurred" and may safely retry.
#[derive(Debug, Clone)]
pub struct FinalizationReport {
    /// Whether the finalization committed
    pub success: bool,
    /// Human-readable outcome description
    pub message: String,
    /// The closed and opened weeks, present only on success
    pub outcome: Option<FinalizeOutcome>,
}

/// Finalizes the active week and opens the next one.
///
/// Steps, in one transaction: authorize the actor, re-read the active week,
/// aggregate its statistics, resolve tax on the total revenue, close the week
/// with the snapshot, open week `number + 1` for the following period, and
/// re-verify the single-active invariant before committing.
///
/// `expected_week_number` is the double-submit guard: when provided and the
/// active week has already moved on, the call fails with
/// [`Error::WeekAlreadyFinalized`] instead of silently closing the new week.
///
/// `next_period` overrides the default roll-forward of
/// `end + 1 day .. end + 7 days`.
///
/// # Errors
/// - [`Error::Unauthorized`] when the actor lacks the privileged role
/// - [`Error::NoActiveWeek`] / [`Error::WeekAlreadyFinalized`] when the
///   precondition fails; no state is changed
/// - [`Error::Database`] and others roll the transaction back entirely
pub async fn finalize_week(
    db: &DatabaseConnection,
    settings: &LedgerSettings,
    actor: &user::Model,
    expected_week_number: Option<i64>,
    next_period: Option<(NaiveDate, NaiveDate)>,
) -> Result<FinalizeOutcome> {
    auth::require_finalizer(actor, settings)?;

    // Dropping the transaction on any early return rolls it back
    let txn = db.begin().await?;

    let active = week::get_active_week(&txn)
        .await?
        .ok_or(Error::NoActiveWeek)?;

    if active.is_finalized {
        return Err(Error::WeekAlreadyFinalized {
            week_number: active.week_number,
        });
    }

    if let Some(expected) = expected_week_number {
        if expected != active.week_number {
            return Err(Error::WeekAlreadyFinalized {
                week_number: expected,
            });
        }
    }

    let statistics = stats::aggregate_week(&txn, settings, active.id).await?;
    let schedule = tax::load_bracket_schedule(&txn).await?;
    let resolution = tax::resolve_tax(statistics.total_revenue(), &schedule);

    let snapshot = week::WeekSnapshot {
        total_revenue: statistics.total_revenue(),
        total_sales_count: statistics.sales_count(),
        total_cleaning_revenue: statistics.cleaning_revenue(),
        total_cleaning_count: statistics.cleaning_count(),
        tax_amount: resolution.tax_amount,
        effective_tax_rate: resolution.effective_rate,
        tax_breakdown: Some(serde_json::to_string(&resolution.breakdown)?),
    };

    let next_week_number = active.week_number + 1;
    let (next_start, next_end) = next_period.unwrap_or((
        active.period_end + Days::new(1),
        active.period_end + Days::new(7),
    ));

    let closed = week::close_active_week(&txn, active, &actor.username, snapshot).await?;
    let opened = week::create_week(
        &txn,
        next_week_number,
        next_start,
        next_end,
        Some(actor.username.clone()),
    )
    .await?;

    week::assert_single_active_week(&txn).await?;
    txn.commit().await?;

    info!(
        closed_week = closed.week_number,
        total_revenue = closed.total_revenue,
        tax_amount = closed.tax_amount,
        opened_week = opened.week_number,
        finalized_by = %actor.username,
        "week finalized"
    );

    Ok(FinalizeOutcome { closed, opened })
}

/// Boundary wrapper around [`finalize_week`]: every error is caught, logged,
/// and turned into a structured [`FinalizationReport`] instead of propagating
/// to the caller. The transaction is already rolled back by the time the
/// failure surfaces.
pub async fn run_finalization(
    db: &DatabaseConnection,
    settings: &LedgerSettings,
    actor: &user::Model,
    expected_week_number: Option<i64>,
    next_period: Option<(NaiveDate, NaiveDate)>,
) -> FinalizationReport {
    match finalize_week(db, settings, actor, expected_week_number, next_period).await {
        Ok(outcome) => FinalizationReport {
            success: true,
            message: format!(
                "Week #{} finalized ({:.2} revenue, {:.2} tax); week #{} opened",
                outcome.closed.week_number,
                outcome.closed.total_revenue,
                outcome.closed.tax_amount,
                outcome.opened.week_number
            ),
            outcome: Some(outcome),
        },
        Err(err) => {
            error!(error = %err, precondition = err.is_precondition(), "week finalization failed");
            FinalizationReport {
                success: false,
                message: err.to_string(),
                outcome: None,
            }
        }
    }
}
