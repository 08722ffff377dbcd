//! Tax bracket resolver - maps a revenue figure to its flat tax.
//!
//! The schedule is flat-rate-per-bracket, NOT progressive: the single bracket
//! containing the revenue taxes the entire amount at its rate. This matches
//! the bar's books as they are actually kept; do not "fix" it into a marginal
//! scheme. No matching bracket (e.g. an empty schedule) is a defined
//! degenerate case that yields zero tax, not an error.

use crate::{
    config::BracketConfig,
    entities::{TaxBracket, tax_bracket},
    errors::Result,
};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::{Deserialize, Serialize};

/// Detail of one bracket applied to a revenue figure. The breakdown is a list
/// for snapshot compatibility, but the flat scheme always produces zero or
/// one entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketApplication {
    /// Lower bound of the matched bracket
    pub min_revenue: f64,
    /// Upper bound of the matched bracket, None = unbounded
    pub max_revenue: Option<f64>,
    /// Flat rate of the matched bracket
    pub rate: f64,
    /// Revenue taxed at this rate (the entire revenue under the flat scheme)
    pub taxable: f64,
    /// Tax owed from this bracket
    pub tax: f64,
}

/// Result of resolving tax for a revenue figure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxResolution {
    /// Total tax owed
    pub tax_amount: f64,
    /// Rate of the matched bracket (0.0 when nothing matched)
    pub effective_rate: f64,
    /// Bracket application detail, empty when nothing matched
    pub breakdown: Vec<BracketApplication>,
}

impl TaxResolution {
    /// The zero-tax resolution used when no bracket matches.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            tax_amount: 0.0,
            effective_rate: 0.0,
            breakdown: Vec::new(),
        }
    }
}

/// Resolves the tax owed on `revenue` against a bracket schedule.
///
/// Scans brackets in ascending `min_revenue` order and applies the first one
/// where `revenue >= min_revenue` and (`max_revenue` is unbounded or
/// `revenue <= max_revenue`). The schedule is validated non-overlapping and
/// gapless at configuration load; this function does not self-heal bad data,
/// first match wins by scan order.
#[must_use]
pub fn resolve_tax(revenue: f64, brackets: &[tax_bracket::Model]) -> TaxResolution {
    if revenue < 0.0 {
        return TaxResolution::zero();
    }

    for bracket in brackets {
        let within_upper = bracket.max_revenue.is_none_or(|max| revenue <= max);
        if revenue >= bracket.min_revenue && within_upper {
            let tax = revenue * bracket.rate;
            return TaxResolution {
                tax_amount: tax,
                effective_rate: bracket.rate,
                breakdown: vec![BracketApplication {
                    min_revenue: bracket.min_revenue,
                    max_revenue: bracket.max_revenue,
                    rate: bracket.rate,
                    taxable: revenue,
                    tax,
                }],
            };
        }
    }

    TaxResolution::zero()
}

/// Loads the bracket schedule from the database, ascending by `min_revenue`.
pub async fn load_bracket_schedule<C>(db: &C) -> Result<Vec<tax_bracket::Model>>
where
    C: ConnectionTrait,
{
    TaxBracket::find()
        .order_by_asc(tax_bracket::Column::MinRevenue)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Seeds the bracket table from the validated config schedule. Only runs when
/// the table is empty; the schedule is static reference data, not something
/// startup should silently rewrite.
pub async fn seed_bracket_schedule(
    db: &DatabaseConnection,
    brackets: &[BracketConfig],
) -> Result<usize> {
    let existing = TaxBracket::find().count(db).await?;
    if existing > 0 {
        return Ok(0);
    }

    for bracket in brackets {
        let model = tax_bracket::ActiveModel {
            min_revenue: Set(bracket.min_revenue),
            max_revenue: Set(bracket.max_revenue),
            rate: Set(bracket.rate),
            ..Default::default()
        };
        model.insert(db).await?;
    }

    Ok(brackets.len())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    fn bracket(id: i32, min: f64, max: Option<f64>, rate: f64) -> tax_bracket::Model {
        tax_bracket::Model {
            id,
            min_revenue: min,
            max_revenue: max,
            rate,
        }
    }

    fn schedule() -> Vec<tax_bracket::Model> {
        vec![
            bracket(1, 0.0, Some(500.0), 0.10),
            bracket(2, 500.01, Some(2000.0), 0.15),
            bracket(3, 2000.01, None, 0.20),
        ]
    }

    #[test]
    fn test_resolve_tax_matches_single_bracket() {
        let resolution = resolve_tax(850.0, &schedule());

        assert_eq!(resolution.tax_amount, 127.5);
        assert_eq!(resolution.effective_rate, 0.15);
        assert_eq!(resolution.breakdown.len(), 1);
        assert_eq!(resolution.breakdown[0].taxable, 850.0);
        assert_eq!(resolution.breakdown[0].min_revenue, 500.01);
    }

    #[test]
    fn test_resolve_tax_is_flat_not_progressive() {
        // The whole revenue is taxed at the matched rate; nothing is carved
        // out at the lower bracket's rate.
        let resolution = resolve_tax(600.0, &schedule());
        assert_eq!(resolution.tax_amount, 600.0 * 0.15);
        assert_eq!(resolution.breakdown.len(), 1);
    }

    #[test]
    fn test_resolve_tax_bounds_are_inclusive() {
        assert_eq!(resolve_tax(500.0, &schedule()).effective_rate, 0.10);
        assert_eq!(resolve_tax(500.01, &schedule()).effective_rate, 0.15);
        assert_eq!(resolve_tax(2000.0, &schedule()).effective_rate, 0.15);
        assert_eq!(resolve_tax(0.0, &schedule()).effective_rate, 0.10);
    }

    #[test]
    fn test_resolve_tax_unbounded_tail() {
        let resolution = resolve_tax(1_000_000.0, &schedule());
        assert_eq!(resolution.effective_rate, 0.20);
        assert_eq!(resolution.tax_amount, 200_000.0);
    }

    #[test]
    fn test_resolve_tax_empty_schedule_is_zero() {
        let resolution = resolve_tax(850.0, &[]);
        assert_eq!(resolution, TaxResolution::zero());
    }

    #[test]
    fn test_resolve_tax_negative_revenue_is_zero() {
        let resolution = resolve_tax(-10.0, &schedule());
        assert_eq!(resolution, TaxResolution::zero());
    }

    #[test]
    fn test_tax_monotonic_within_bracket() {
        let schedule = schedule();
        let low = resolve_tax(600.0, &schedule);
        let high = resolve_tax(1900.0, &schedule);

        assert!(high.tax_amount > low.tax_amount);
        // Flat rate: tax / revenue is constant inside one bracket
        assert_eq!(low.tax_amount / 600.0, high.tax_amount / 1900.0);
    }

    #[test]
    fn test_breakdown_round_trips_through_json() {
        let resolution = resolve_tax(850.0, &schedule());
        let json = serde_json::to_string(&resolution.breakdown).unwrap();
        let parsed: Vec<BracketApplication> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, resolution.breakdown);
    }

    #[tokio::test]
    async fn test_seed_bracket_schedule_only_when_empty() -> Result<()> {
        let db = setup_test_db().await?;
        let config = default_bracket_config();

        let seeded = seed_bracket_schedule(&db, &config).await?;
        assert_eq!(seeded, config.len());

        // Second seed is a no-op
        let reseeded = seed_bracket_schedule(&db, &config).await?;
        assert_eq!(reseeded, 0);

        let loaded = load_bracket_schedule(&db).await?;
        assert_eq!(loaded.len(), config.len());
        assert!(loaded.windows(2).all(|w| w[0].min_revenue < w[1].min_revenue));

        Ok(())
    }
}
