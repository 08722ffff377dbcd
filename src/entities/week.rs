//! Week entity - Represents one accounting period of the ledger.
//!
//! Exactly one week is active at any time; it is the period new sales and
//! cleaning services attach to. Finalization flips a week to
//! `is_finalized = true, is_active = false` and freezes the snapshot
//! aggregate columns. A finalized week is never mutated or deleted again.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Week database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "weeks")]
pub struct Model {
    /// Unique identifier for the week
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Monotonically increasing accounting week number
    #[sea_orm(unique)]
    pub week_number: i64,
    /// First day of the period (inclusive)
    pub period_start: Date,
    /// Last day of the period (inclusive); the next week starts one day later
    pub period_end: Date,
    /// Whether this is the single open week accepting new records
    pub is_active: bool,
    /// Whether this week has been closed out; once true, never reverts
    pub is_finalized: bool,
    /// Snapshot: total revenue (sales + cleaning), frozen at finalization
    pub total_revenue: f64,
    /// Snapshot: number of sales in the period
    pub total_sales_count: i64,
    /// Snapshot: cleaning revenue (`count * unit rate`)
    pub total_cleaning_revenue: f64,
    /// Snapshot: number of completed cleaning units in the period
    pub total_cleaning_count: i64,
    /// Tax owed on the snapshot revenue
    pub tax_amount: f64,
    /// Flat rate of the bracket that matched the snapshot revenue
    pub effective_tax_rate: f64,
    /// JSON detail of the bracket application, None until finalization
    pub tax_breakdown: Option<String>,
    /// Whether the tax fields have been computed and frozen
    pub tax_finalized: bool,
    /// Username of whoever opened this week
    pub created_by: Option<String>,
    /// Username of whoever finalized this week
    pub finalized_by: Option<String>,
    /// When the week was opened
    pub created_at: DateTimeUtc,
    /// When the week was finalized, None while still open
    pub finalized_at: Option<DateTimeUtc>,
}

/// Defines relationships between Week and its child record entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One week has many sales
    #[sea_orm(has_many = "super::sale::Entity")]
    Sales,
    /// One week has many cleaning service records
    #[sea_orm(has_many = "super::cleaning_service::Entity")]
    CleaningServices,
}

impl Related<super::sale::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sales.def()
    }
}

impl Related<super::cleaning_service::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CleaningServices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
