//! Sale entity - One bar sale, attached to the week that was active when it
//! was recorded. Sales are read-only from the ledger core's perspective:
//! finalization aggregates them but never mutates them.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sale database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sales")]
pub struct Model {
    /// Unique identifier for the sale
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Week the sale belongs to, assigned from the active week at creation
    pub week_id: i64,
    /// Sale amount in dollars
    pub amount: f64,
    /// Optional description of what was sold
    pub description: Option<String>,
    /// Identity of the employee who recorded the sale
    pub recorded_by: String,
    /// When the sale was recorded
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Sale and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each sale belongs to one week
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
