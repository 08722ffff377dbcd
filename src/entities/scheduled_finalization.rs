//! Scheduled finalization entity - A request to finalize the active week at a
//! later time. Picked up best-effort by the periodic poller; a row is marked
//! executed exactly once, whether the finalization succeeded or not, with the
//! outcome recorded in `message`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Scheduled finalization database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "scheduled_finalizations")]
pub struct Model {
    /// Unique identifier for the request
    #[sea_orm(primary_key)]
    pub id: i64,
    /// When the finalization should run
    pub due_at: DateTimeUtc,
    /// Week number that was active when the request was made; the execution
    /// refuses to close any other week
    pub target_week_number: i64,
    /// User id of the employee who requested the finalization
    pub requested_by: i64,
    /// Whether the poller has picked this row up
    pub executed: bool,
    /// When the poller executed the request, None while pending
    pub executed_at: Option<DateTimeUtc>,
    /// Outcome note written by the poller
    pub message: Option<String>,
}

/// `ScheduledFinalization` has no relationships the core needs to navigate
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
