//! Trip planning logic
//!
//! The scoring, conflict and forecast functions are pure and operate on
//! snapshots. [`Planner`] wires them to storage and the transport provider.

pub mod conflicts;
pub mod forecast;
pub mod optimizer;
pub mod search;
pub mod service;

pub use conflicts::evaluate_conflicts;
pub use forecast::{BudgetPolicy, forecast_budget};
pub use optimizer::{DestinationScore, score_destinations};
pub use search::{stay_quotes, transport_quotes};
pub use service::Planner;

/// Round half away from zero to `precision` decimal places
#[must_use]
pub fn round_to(value: f64, precision: i32) -> f64 {
    let factor = 10f64.powi(precision);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::round_to;
    use rstest::rstest;

    #[rstest]
    #[case(2.47, 1, 2.5)]
    #[case(4.94, 1, 4.9)]
    #[case(57.035, 0, 57.0)]
    #[case(420.004, 2, 420.0)]
    #[case(-12.345, 1, -12.3)]
    fn test_round_to(#[case] value: f64, #[case] precision: i32, #[case] expected: f64) {
        assert!((round_to(value, precision) - expected).abs() < 1e-9);
    }
}
