//! Ledger configuration loading from config.toml
//!
//! This module loads the bar's ledger settings: the cleaning unit rate, the
//! excluded synthetic cleaning identity, the privileged role allowed to
//! finalize weeks, the optional opening week for first-run seeding, and the
//! tax bracket schedule. The schedule is validated here, at load time; the
//! resolver itself trusts the data and takes the first matching bracket.

use crate::errors::{Error, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::Path;

/// Largest gap (in dollars) tolerated between one bracket's max and the next
/// bracket's min before the schedule is rejected as non-contiguous. One cent,
/// since bracket bounds are expressed at cent granularity.
const BRACKET_CONTIGUITY_TOLERANCE: f64 = 0.01;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Ledger-wide settings
    pub ledger: LedgerSettings,
    /// Tax bracket schedule, ascending by `min_revenue`
    #[serde(default)]
    pub tax_brackets: Vec<BracketConfig>,
}

/// Ledger-wide settings from the `[ledger]` table
#[derive(Debug, Deserialize, Clone)]
pub struct LedgerSettings {
    /// Dollars of revenue credited per cleaning unit
    #[serde(default = "default_cleaning_unit_rate")]
    pub cleaning_unit_rate: f64,
    /// Employee identity whose cleaning records never count toward revenue.
    /// A data-hygiene carve-out for synthetic test records; None disables it.
    pub excluded_cleaning_identity: Option<String>,
    /// The single role allowed to finalize weeks
    #[serde(default = "default_privileged_role")]
    pub privileged_role: String,
    /// Week to open on first run when the ledger is empty
    pub opening_week: Option<OpeningWeek>,
}

/// First-run seed data for the opening week
#[derive(Debug, Deserialize, Clone)]
pub struct OpeningWeek {
    /// Week number to start counting from
    pub week_number: i64,
    /// First day of the opening period; the period runs seven days
    pub period_start: NaiveDate,
}

/// Configuration for a single tax bracket
#[derive(Debug, Deserialize, Clone)]
pub struct BracketConfig {
    /// Lowest revenue (inclusive) this bracket applies to
    pub min_revenue: f64,
    /// Highest revenue (inclusive), omitted for the unbounded tail bracket
    pub max_revenue: Option<f64>,
    /// Flat rate in [0, 1] applied to the entire revenue
    pub rate: f64,
}

const fn default_cleaning_unit_rate() -> f64 {
    60.0
}

fn default_privileged_role() -> String {
    "manager".to_string()
}

/// Loads ledger configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Validates the bracket schedule: ascending, non-overlapping, contiguous
/// from zero, rates in [0, 1], and only the last bracket unbounded.
///
/// An empty schedule is accepted; the resolver treats it as "no tax", which
/// is a defined degenerate case rather than an error.
///
/// # Errors
/// Returns [`Error::Config`] naming the first violated rule.
pub fn validate_brackets(brackets: &[BracketConfig]) -> Result<()> {
    let mut previous_max: Option<f64> = Some(-BRACKET_CONTIGUITY_TOLERANCE);

    for (index, bracket) in brackets.iter().enumerate() {
        if !(0.0..=1.0).contains(&bracket.rate) {
            return Err(Error::Config {
                message: format!(
                    "Tax bracket {index}: rate {} is outside [0, 1]",
                    bracket.rate
                ),
            });
        }

        if bracket.min_revenue < 0.0 {
            return Err(Error::Config {
                message: format!(
                    "Tax bracket {index}: min_revenue {} is negative",
                    bracket.min_revenue
                ),
            });
        }

        match previous_max {
            // The previous bracket was unbounded, nothing may follow it
            None => {
                return Err(Error::Config {
                    message: format!(
                        "Tax bracket {index}: only the last bracket may omit max_revenue"
                    ),
                });
            }
            Some(prev_max) => {
                if bracket.min_revenue <= prev_max {
                    return Err(Error::Config {
                        message: format!(
                            "Tax bracket {index}: min_revenue {} overlaps the previous bracket",
                            bracket.min_revenue
                        ),
                    });
                }
                if bracket.min_revenue - prev_max > BRACKET_CONTIGUITY_TOLERANCE {
                    return Err(Error::Config {
                        message: format!(
                            "Tax bracket {index}: gap between {prev_max} and {}",
                            bracket.min_revenue
                        ),
                    });
                }
            }
        }

        if let Some(max) = bracket.max_revenue {
            if max < bracket.min_revenue {
                return Err(Error::Config {
                    message: format!(
                        "Tax bracket {index}: max_revenue {max} is below min_revenue {}",
                        bracket.min_revenue
                    ),
                });
            }
        }

        previous_max = bracket.max_revenue;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    fn bracket(min: f64, max: Option<f64>, rate: f64) -> BracketConfig {
        BracketConfig {
            min_revenue: min,
            max_revenue: max,
            rate,
        }
    }

    #[test]
    fn test_parse_ledger_config() {
        let toml_str = r#"
            [ledger]
            cleaning_unit_rate = 60.0
            excluded_cleaning_identity = "test-employee"
            privileged_role = "manager"

            [ledger.opening_week]
            week_number = 1
            period_start = "2024-01-01"

            [[tax_brackets]]
            min_revenue = 0.0
            max_revenue = 500.0
            rate = 0.10

            [[tax_brackets]]
            min_revenue = 500.01
            rate = 0.15
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.ledger.cleaning_unit_rate, 60.0);
        assert_eq!(
            config.ledger.excluded_cleaning_identity.as_deref(),
            Some("test-employee")
        );
        assert_eq!(config.ledger.privileged_role, "manager");

        let opening = config.ledger.opening_week.unwrap();
        assert_eq!(opening.week_number, 1);
        assert_eq!(
            opening.period_start,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );

        assert_eq!(config.tax_brackets.len(), 2);
        assert_eq!(config.tax_brackets[0].max_revenue, Some(500.0));
        assert_eq!(config.tax_brackets[1].max_revenue, None);
        assert_eq!(config.tax_brackets[1].rate, 0.15);
    }

    #[test]
    fn test_parse_defaults() {
        let config: Config = toml::from_str("[ledger]\n").unwrap();
        assert_eq!(config.ledger.cleaning_unit_rate, 60.0);
        assert_eq!(config.ledger.privileged_role, "manager");
        assert!(config.ledger.excluded_cleaning_identity.is_none());
        assert!(config.tax_brackets.is_empty());
    }

    #[test]
    fn test_validate_valid_schedule() {
        let schedule = vec![
            bracket(0.0, Some(500.0), 0.10),
            bracket(500.01, Some(2000.0), 0.15),
            bracket(2000.01, None, 0.20),
        ];
        assert!(validate_brackets(&schedule).is_ok());
    }

    #[test]
    fn test_validate_empty_schedule_is_ok() {
        assert!(validate_brackets(&[]).is_ok());
    }

    #[test]
    fn test_validate_rejects_overlap() {
        let schedule = vec![
            bracket(0.0, Some(500.0), 0.10),
            bracket(400.0, None, 0.15),
        ];
        assert!(matches!(
            validate_brackets(&schedule),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_gap() {
        let schedule = vec![
            bracket(0.0, Some(500.0), 0.10),
            bracket(600.0, None, 0.15),
        ];
        assert!(matches!(
            validate_brackets(&schedule),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_schedule_not_starting_at_zero() {
        let schedule = vec![bracket(100.0, None, 0.10)];
        assert!(matches!(
            validate_brackets(&schedule),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_bracket_after_unbounded() {
        let schedule = vec![bracket(0.0, None, 0.10), bracket(500.01, None, 0.15)];
        assert!(matches!(
            validate_brackets(&schedule),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_rate_out_of_range() {
        let schedule = vec![bracket(0.0, None, 1.5)];
        assert!(matches!(
            validate_brackets(&schedule),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_inverted_bounds() {
        let schedule = vec![bracket(0.0, Some(500.0), 0.10), bracket(500.01, Some(100.0), 0.15)];
        assert!(matches!(
            validate_brackets(&schedule),
            Err(Error::Config { .. })
        ));
    }
}
