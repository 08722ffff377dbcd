//! Cleaning service intake - logs cleaning jobs against the active week.

use crate::{
    core::week,
    entities::{CleaningService, cleaning_service},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};

/// Logs a cleaning job against the currently active week.
///
/// # Errors
/// - [`Error::InvalidAmount`] when `cleaning_count` is not positive
/// - [`Error::NoActiveWeek`] when the ledger has no open week
#[allow(clippy::cast_precision_loss)]
pub async fn record_cleaning(
    db: &DatabaseConnection,
    employee_id: String,
    cleaning_count: i64,
    status: &str,
) -> Result<cleaning_service::Model> {
    if cleaning_count <= 0 {
        return Err(Error::InvalidAmount {
            amount: cleaning_count as f64,
        });
    }

    let txn = db.begin().await?;

    let active = week::get_active_week(&txn)
        .await?
        .ok_or(Error::NoActiveWeek)?;

    let record = cleaning_service::ActiveModel {
        week_id: Set(active.id),
        employee_id: Set(employee_id),
        cleaning_count: Set(cleaning_count),
        status: Set(status.to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let result = record.insert(&txn).await?;
    txn.commit().await?;

    Ok(result)
}

/// Marks a pending cleaning job as completed so it counts toward revenue.
pub async fn complete_cleaning(
    db: &DatabaseConnection,
    cleaning_id: i64,
) -> Result<cleaning_service::Model> {
    let record = CleaningService::find_by_id(cleaning_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::Config {
            message: format!("Cleaning record {cleaning_id} not found"),
        })?;

    let mut model: cleaning_service::ActiveModel = record.into();
    model.status = Set(cleaning_service::STATUS_COMPLETED.to_string());

    let updated = model.update(db).await?;
    Ok(updated)
}

/// Retrieves all cleaning records for a week, newest first.
pub async fn get_cleaning_for_week(
    db: &DatabaseConnection,
    week_id: i64,
) -> Result<Vec<cleaning_service::Model>> {
    CleaningService::find()
        .filter(cleaning_service::Column::WeekId.eq(week_id))
        .order_by_desc(cleaning_service::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}
