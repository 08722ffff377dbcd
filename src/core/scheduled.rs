//! Deferred finalization - best-effort poll-and-execute.
//!
//! A manager can ask for the week to be closed at a later time; the request
//! is a row in `scheduled_finalizations`, picked up by a periodic poller.
//! Each due row is executed exactly once and marked with the outcome, whether
//! the finalization succeeded or not. There is no coordination guarantee
//! beyond "run periodically, pick up due rows" - the finalization itself
//! carries all the safety.

use crate::{
    config::LedgerSettings,
    core::{auth, finalize, week},
    entities::{ScheduledFinalization, scheduled_finalization},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{info, warn};

/// Queues a finalization request for `due_at`.
///
/// The currently active week number is captured into the request; execution
/// passes it through the double-submit guard, so a request can only ever
/// close the week it was made for.
pub async fn schedule_finalization(
    db: &DatabaseConnection,
    due_at: DateTime<Utc>,
    requested_by: i64,
) -> Result<scheduled_finalization::Model> {
    let active = week::get_active_week(db).await?.ok_or(Error::NoActiveWeek)?;

    let request = scheduled_finalization::ActiveModel {
        due_at: Set(due_at),
        target_week_number: Set(active.week_number),
        requested_by: Set(requested_by),
        executed: Set(false),
        executed_at: Set(None),
        message: Set(None),
        ..Default::default()
    };

    let result = request.insert(db).await?;
    info!(request_id = result.id, %due_at, "queued deferred finalization");
    Ok(result)
}

/// Lists unexecuted requests that are due at `now`, oldest first.
pub async fn pending_finalizations(
    db: &DatabaseConnection,
    now: DateTime<Utc>,
) -> Result<Vec<scheduled_finalization::Model>> {
    ScheduledFinalization::find()
        .filter(scheduled_finalization::Column::Executed.eq(false))
        .filter(scheduled_finalization::Column::DueAt.lte(now))
        .order_by_asc(scheduled_finalization::Column::DueAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Executes every due request, marking each as executed with its outcome.
///
/// The requesting user is re-resolved at execution time, so a role change or
/// suspension between scheduling and execution is honored by the normal
/// authorization gate. The stored target week number is passed as the
/// double-submit guard: a request whose week has already been closed (for
/// example after a crash between commit and marking the row executed) is
/// rejected as a precondition failure instead of closing the following week.
/// Returns one report per executed request.
pub async fn run_due_finalizations(
    db: &DatabaseConnection,
    settings: &LedgerSettings,
    now: DateTime<Utc>,
) -> Result<Vec<finalize::FinalizationReport>> {
    let due = pending_finalizations(db, now).await?;
    let mut reports = Vec::with_capacity(due.len());

    for request in due {
        let report = match auth::get_user_by_id(db, request.requested_by).await? {
            Some(requester) => {
                finalize::run_finalization(
                    db,
                    settings,
                    &requester,
                    Some(request.target_week_number),
                    None,
                )
                .await
            }
            None => finalize::FinalizationReport {
                success: false,
                message: format!("Requesting user {} no longer exists", request.requested_by),
                outcome: None,
            },
        };

        if !report.success {
            warn!(
                request_id = request.id,
                message = %report.message,
                "deferred finalization did not run"
            );
        }

        let mut model: scheduled_finalization::ActiveModel = request.into();
        model.executed = Set(true);
        model.executed_at = Set(Some(now));
        model.message = Set(Some(report.message.clone()));
        model.update(db).await?;

        reports.push(report);
    }

    Ok(reports)
}
