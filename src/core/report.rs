//! Report generation business logic.
//!
//! Builds structured weekly reports for the bot layer: live aggregates while
//! a week is open, the frozen snapshot once it has been finalized. All
//! functions are framework-agnostic and return data the bot formats.

use crate::{
    config::LedgerSettings,
    core::{stats, tax},
    entities::week,
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// A weekly revenue report.
#[derive(Debug, Clone)]
pub struct WeekReport {
    /// The week being reported on
    pub week: week::Model,
    /// Number of sales
    pub sales_count: i64,
    /// Revenue from sales
    pub sales_revenue: f64,
    /// Completed cleaning units
    pub cleaning_count: i64,
    /// Revenue from cleaning
    pub cleaning_revenue: f64,
    /// Total revenue
    pub total_revenue: f64,
    /// Tax owed: frozen for finalized weeks, a projection for open ones
    pub tax_amount: f64,
    /// Rate behind `tax_amount`
    pub effective_tax_rate: f64,
    /// True when the figures come from live aggregation rather than the
    /// frozen snapshot
    pub is_live: bool,
}

/// Generates a report for one week. Finalized weeks report their immutable
/// snapshot; open weeks are aggregated live and get a tax projection from the
/// current bracket schedule.
pub async fn generate_week_report(
    db: &DatabaseConnection,
    settings: &LedgerSettings,
    week: week::Model,
) -> Result<WeekReport> {
    if week.is_finalized {
        return Ok(WeekReport {
            sales_count: week.total_sales_count,
            sales_revenue: week.total_revenue - week.total_cleaning_revenue,
            cleaning_count: week.total_cleaning_count,
            cleaning_revenue: week.total_cleaning_revenue,
            total_revenue: week.total_revenue,
            tax_amount: week.tax_amount,
            effective_tax_rate: week.effective_tax_rate,
            is_live: false,
            week,
        });
    }

    let statistics = stats::aggregate_week(db, settings, week.id).await?;
    let schedule = tax::load_bracket_schedule(db).await?;
    let projection = tax::resolve_tax(statistics.total_revenue(), &schedule);

    Ok(WeekReport {
        sales_count: statistics.sales_count(),
        sales_revenue: statistics.sales_revenue(),
        cleaning_count: statistics.cleaning_count(),
        cleaning_revenue: statistics.cleaning_revenue(),
        total_revenue: statistics.total_revenue(),
        tax_amount: projection.tax_amount,
        effective_tax_rate: projection.effective_rate,
        is_live: true,
        week,
    })
}

/// Formats a week report into the text block the bot posts.
#[must_use]
pub fn format_week_report(report: &WeekReport) -> String {
    let state = if report.week.is_finalized {
        "finalized"
    } else {
        "open"
    };

    let mut text = format!(
        "**Week #{}** ({} to {}) - {}\n",
        report.week.week_number,
        report.week.period_start.format("%Y-%m-%d"),
        report.week.period_end.format("%Y-%m-%d"),
        state
    );
    text.push_str(&format!(
        "  Sales: {} for ${:.2}\n",
        report.sales_count, report.sales_revenue
    ));
    text.push_str(&format!(
        "  Cleaning: {} units for ${:.2}\n",
        report.cleaning_count, report.cleaning_revenue
    ));
    text.push_str(&format!("  Total revenue: ${:.2}\n", report.total_revenue));
    text.push_str(&format!(
        "  Tax{}: ${:.2} ({:.1}%)\n",
        if report.is_live { " (projected)" } else { "" },
        report.tax_amount,
        report.effective_tax_rate * 100.0
    ));

    text
}

/// Formats the one-line summary used by the week list command.
#[must_use]
pub fn format_week_line(week: &week::Model) -> String {
    if week.is_finalized {
        format!(
            "#{} | {} to {} | ${:.2} revenue | ${:.2} tax",
            week.week_number,
            week.period_start.format("%Y-%m-%d"),
            week.period_end.format("%Y-%m-%d"),
            week.total_revenue,
            week.tax_amount
        )
    } else {
        format!(
            "#{} | {} to {} | open",
            week.week_number,
            week.period_start.format("%Y-%m-%d"),
            week.period_end.format("%Y-%m-%d")
        )
    }
}
