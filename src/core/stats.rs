//! Week statistics aggregator - live revenue totals for one week.
//!
//! Sums sales and completed cleaning records scoped to a week id. Cleaning
//! revenue is derived from a configured per-unit rate, and one configured
//! identity (synthetic test data) is excluded from cleaning counts.
//!
//! The bar's store has historically been partially migrated, so a backing
//! table may be structurally absent. That is not an error here: each source
//! is reported as a typed [`SourceAggregate`], and a missing source
//! contributes zero. Tests can therefore tell "zero activity" apart from
//! "source unavailable".

use crate::{
    config::LedgerSettings,
    entities::{CleaningService, Sale, cleaning_service, sale},
    errors::Result,
};
use sea_orm::{FromQueryResult, QuerySelect, Statement, prelude::*};
use tracing::warn;

/// An aggregate from one data source, or the marker that the source is
/// structurally missing from the store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SourceAggregate<T> {
    /// The source exists; the aggregate may still be all zeroes
    Available(T),
    /// The backing table does not exist; contributes zero everywhere
    Unavailable,
}

impl<T: Copy + Default> SourceAggregate<T> {
    /// The aggregate value, substituting the zero value for a missing source.
    pub fn value(&self) -> T {
        match self {
            Self::Available(inner) => *inner,
            Self::Unavailable => T::default(),
        }
    }

    /// Whether the backing table exists.
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

/// Sales totals for one week
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SalesAggregate {
    /// Number of sales
    pub count: i64,
    /// Sum of sale amounts
    pub revenue: f64,
}

/// Cleaning totals for one week (completed records only, excluded identity
/// filtered out)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CleaningAggregate {
    /// Sum of cleaning units
    pub count: i64,
}

/// Aggregated statistics for one week
#[derive(Debug, Clone, PartialEq)]
pub struct WeekStatistics {
    /// Sales source aggregate
    pub sales: SourceAggregate<SalesAggregate>,
    /// Cleaning source aggregate
    pub cleaning: SourceAggregate<CleaningAggregate>,
    /// Unit rate used to convert cleaning counts to revenue
    pub cleaning_unit_rate: f64,
}

impl WeekStatistics {
    /// Number of sales in the week.
    #[must_use]
    pub fn sales_count(&self) -> i64 {
        self.sales.value().count
    }

    /// Revenue from sales.
    #[must_use]
    pub fn sales_revenue(&self) -> f64 {
        self.sales.value().revenue
    }

    /// Completed cleaning units, excluded identity already filtered out.
    #[must_use]
    pub fn cleaning_count(&self) -> i64 {
        self.cleaning.value().count
    }

    /// Cleaning revenue: `count * unit rate`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn cleaning_revenue(&self) -> f64 {
        self.cleaning_count() as f64 * self.cleaning_unit_rate
    }

    /// Total revenue: sales plus cleaning.
    #[must_use]
    pub fn total_revenue(&self) -> f64 {
        self.sales_revenue() + self.cleaning_revenue()
    }
}

#[derive(FromQueryResult)]
struct SalesRow {
    count: i64,
    revenue: Option<f64>,
}

#[derive(FromQueryResult)]
struct CleaningRow {
    count: Option<i64>,
}

/// Checks whether a table is present in the `SQLite` schema. This is the
/// explicit capability check behind the "missing source = empty contribution"
/// behavior.
async fn table_exists<C>(db: &C, table: &str) -> Result<bool>
where
    C: ConnectionTrait,
{
    let stmt = Statement::from_sql_and_values(
        db.get_database_backend(),
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?",
        [table.into()],
    );
    Ok(db.query_one(stmt).await?.is_some())
}

async fn aggregate_sales<C>(db: &C, week_id: i64) -> Result<SourceAggregate<SalesAggregate>>
where
    C: ConnectionTrait,
{
    if !table_exists(db, "sales").await? {
        warn!(week_id, "sales table missing, counting zero sales revenue");
        return Ok(SourceAggregate::Unavailable);
    }

    let row = Sale::find()
        .select_only()
        .column_as(sale::Column::Id.count(), "count")
        .column_as(sale::Column::Amount.sum(), "revenue")
        .filter(sale::Column::WeekId.eq(week_id))
        .into_model::<SalesRow>()
        .one(db)
        .await?;

    // An aggregate without GROUP BY always yields one row; guard anyway
    let row = row.map_or(
        SalesAggregate::default(),
        |r| SalesAggregate {
            count: r.count,
            revenue: r.revenue.unwrap_or(0.0),
        },
    );

    Ok(SourceAggregate::Available(row))
}

async fn aggregate_cleaning<C>(
    db: &C,
    settings: &LedgerSettings,
    week_id: i64,
) -> Result<SourceAggregate<CleaningAggregate>>
where
    C: ConnectionTrait,
{
    if !table_exists(db, "cleaning_services").await? {
        warn!(week_id, "cleaning_services table missing, counting zero cleaning revenue");
        return Ok(SourceAggregate::Unavailable);
    }

    let mut query = CleaningService::find()
        .select_only()
        .column_as(cleaning_service::Column::CleaningCount.sum(), "count")
        .filter(cleaning_service::Column::WeekId.eq(week_id))
        .filter(cleaning_service::Column::Status.eq(cleaning_service::STATUS_COMPLETED));

    if let Some(excluded) = &settings.excluded_cleaning_identity {
        query = query.filter(cleaning_service::Column::EmployeeId.ne(excluded.as_str()));
    }

    let row = query.into_model::<CleaningRow>().one(db).await?;
    let count = row.and_then(|r| r.count).unwrap_or(0);

    Ok(SourceAggregate::Available(CleaningAggregate { count }))
}

/// Aggregates sales and cleaning statistics for one week. Safe to call inside
/// the finalization transaction; the snapshot written at finalization is
/// exactly this query's result at that moment.
pub async fn aggregate_week<C>(
    db: &C,
    settings: &LedgerSettings,
    week_id: i64,
) -> Result<WeekStatistics>
where
    C: ConnectionTrait,
{
    let sales = aggregate_sales(db, week_id).await?;
    let cleaning = aggregate_cleaning(db, settings, week_id).await?;

    Ok(WeekStatistics {
        sales,
        cleaning,
        cleaning_unit_rate: settings.cleaning_unit_rate,
    })
}
