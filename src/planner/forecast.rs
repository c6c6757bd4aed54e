//! Monthly affordability forecast

use crate::models::{Affordability, BudgetEntry, ForecastResult};

use super::round_to;

/// Thresholds applied when no per-user figure is available
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetPolicy {
    /// Monthly budget assumed for users without one on record
    pub default_monthly_budget: f64,
    /// Remaining budget below which the forecast turns amber
    pub amber_threshold: f64,
}

impl Default for BudgetPolicy {
    fn default() -> Self {
        Self {
            default_monthly_budget: 900.0,
            amber_threshold: 200.0,
        }
    }
}

/// Project this month's spend including an optional planned trip.
#[must_use]
pub fn forecast_budget(
    entries: &[BudgetEntry],
    monthly_budget: Option<f64>,
    trip_cost: f64,
    policy: &BudgetPolicy,
) -> ForecastResult {
    let spend: f64 = entries.iter().map(|entry| entry.amount).sum();
    let budget = monthly_budget
        .filter(|budget| *budget != 0.0)
        .unwrap_or(policy.default_monthly_budget);

    let projected = spend + trip_cost;
    let remaining = budget - projected;
    let affordability = if remaining < 0.0 {
        Affordability::Red
    } else if remaining < policy.amber_threshold {
        Affordability::Amber
    } else {
        Affordability::Green
    };

    ForecastResult {
        projected_monthly_spend: round_to(projected, 2),
        remaining_budget: round_to(remaining, 2),
        affordability,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn entries(amounts: &[f64]) -> Vec<BudgetEntry> {
        amounts
            .iter()
            .map(|amount| BudgetEntry {
                amount: *amount,
                ..BudgetEntry::default()
            })
            .collect()
    }

    #[rstest]
    #[case(&[420.0, 60.0], 0.0, 480.0, 420.0, Affordability::Green)]
    #[case(&[420.0, 60.0], 220.0, 700.0, 200.0, Affordability::Green)]
    #[case(&[420.0, 60.0, 1.0], 220.0, 701.0, 199.0, Affordability::Amber)]
    #[case(&[420.0, 60.0, 500.0], 220.0, 1200.0, -300.0, Affordability::Red)]
    fn test_forecast_thresholds(
        #[case] amounts: &[f64],
        #[case] trip_cost: f64,
        #[case] projected: f64,
        #[case] remaining: f64,
        #[case] affordability: Affordability,
    ) {
        let result = forecast_budget(
            &entries(amounts),
            Some(900.0),
            trip_cost,
            &BudgetPolicy::default(),
        );
        assert_eq!(result.projected_monthly_spend, projected);
        assert_eq!(result.remaining_budget, remaining);
        assert_eq!(result.affordability, affordability);
    }

    #[test]
    fn test_missing_or_zero_budget_uses_default() {
        let policy = BudgetPolicy::default();
        let unknown = forecast_budget(&[], None, 0.0, &policy);
        assert_eq!(unknown.projected_monthly_spend, 0.0);
        assert_eq!(unknown.remaining_budget, 900.0);
        assert_eq!(unknown.affordability, Affordability::Green);

        let zero = forecast_budget(&[], Some(0.0), 0.0, &policy);
        assert_eq!(zero.remaining_budget, 900.0);
    }

    #[test]
    fn test_policy_is_configurable() {
        let policy = BudgetPolicy {
            default_monthly_budget: 500.0,
            amber_threshold: 450.0,
        };
        let result = forecast_budget(&entries(&[100.0]), None, 0.0, &policy);
        assert_eq!(result.remaining_budget, 400.0);
        assert_eq!(result.affordability, Affordability::Amber);
    }

    #[test]
    fn test_rounds_to_cents() {
        let result = forecast_budget(
            &entries(&[10.004, 0.003]),
            Some(100.0),
            0.0,
            &BudgetPolicy::default(),
        );
        assert_eq!(result.projected_monthly_spend, 10.01);
    }
}
