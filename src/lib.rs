//! `exchange-planner` - Trip planning backend for exchange students
//!
//! This library provides travel-window discovery against the academic
//! calendar, destination scoring, conflict checks, budget forecasting and the
//! HTTP API that serves them.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod planner;
pub mod provider;
pub mod store;
pub mod telemetry;
pub mod web;

// Re-export core types for public API
pub use auth::{AuthSettings, AuthUser};
pub use config::PlannerConfig;
pub use error::PlannerError;
pub use models::{
    AcademicEvent, BudgetEntry, ConflictAlert, DestinationCatalogEntry, ForecastResult, Severity,
    TravelWindow, Trip, TripConstraint, TripOption,
};
pub use planner::{BudgetPolicy, Planner, evaluate_conflicts, score_destinations};
pub use provider::{OpenTransportProvider, TransportProvider};
pub use store::{DataStore, MemoryStore, SqliteStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, PlannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
