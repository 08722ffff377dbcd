//! Cleaning service entity - A cleaning job logged against a week.
//!
//! Only records with `status == "completed"` count toward cleaning revenue.
//! Revenue is derived as `cleaning_count * unit rate`, where the unit rate is
//! a configured constant rather than a per-record column.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Status value for cleaning jobs that count toward revenue
pub const STATUS_COMPLETED: &str = "completed";
/// Status value for cleaning jobs that are logged but not yet done
pub const STATUS_PENDING: &str = "pending";

/// Cleaning service database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cleaning_services")]
pub struct Model {
    /// Unique identifier for the cleaning record
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Week the record belongs to, assigned from the active week at creation
    pub week_id: i64,
    /// Identity of the employee who performed the cleaning
    pub employee_id: String,
    /// Number of cleaning units performed
    pub cleaning_count: i64,
    /// Job status: `"completed"` or `"pending"`
    pub status: String,
    /// When the record was logged
    pub created_at: DateTimeUtc,
}

/// Defines relationships between CleaningService and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each cleaning record belongs to one week
    #[sea_orm(
        belongs_to = "super::week::Entity",
        from = "Column::WeekId",
        to = "super::week::Column::Id"
    )]
    Week,
}

impl Related<super::week::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Week.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
