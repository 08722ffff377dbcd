//! Sales intake - records bar sales against the active week.
//!
//! The week reference is resolved inside a transaction so a sale can never
//! attach to a week that a concurrent finalization is closing.

use crate::{
    core::week,
    entities::{Sale, sale},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};

/// Records a sale against the currently active week.
///
/// # Errors
/// - [`Error::InvalidAmount`] for zero, negative, or non-finite amounts
/// - [`Error::NoActiveWeek`] when the ledger has no open week
pub async fn record_sale(
    db: &DatabaseConnection,
    amount: f64,
    description: Option<String>,
    recorded_by: String,
) -> Result<sale::Model> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidAmount { amount });
    }

    let txn = db.begin().await?;

    let active = week::get_active_week(&txn)
        .await?
        .ok_or(Error::NoActiveWeek)?;

    let new_sale = sale::ActiveModel {
        week_id: Set(active.id),
        amount: Set(amount),
        description: Set(description),
        recorded_by: Set(recorded_by),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let result = new_sale.insert(&txn).await?;
    txn.commit().await?;

    Ok(result)
}

/// Retrieves all sales for a week, newest first.
pub async fn get_sales_for_week(
    db: &DatabaseConnection,
    week_id: i64,
) -> Result<Vec<sale::Model>> {
    Sale::find()
        .filter(sale::Column::WeekId.eq(week_id))
        .order_by_desc(sale::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}
