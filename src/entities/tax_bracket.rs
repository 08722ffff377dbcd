//! Tax bracket entity - Static reference data for the flat-rate schedule.
//!
//! Brackets are non-overlapping, gapless, and ordered by `min_revenue`; the
//! schedule is validated at configuration load and seeded at startup. A `None`
//! `max_revenue` marks the unbounded tail bracket.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Tax bracket database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tax_brackets")]
pub struct Model {
    /// Unique identifier for the bracket
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Lowest revenue (inclusive) this bracket applies to
    pub min_revenue: f64,
    /// Highest revenue (inclusive) this bracket applies to, None = unbounded
    pub max_revenue: Option<f64>,
    /// Flat rate applied to the ENTIRE revenue when this bracket matches
    pub rate: f64,
}

/// `TaxBracket` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
