//! Data models for the exchange planner
//!
//! This module contains the domain models organized by concern:
//! - Academic: calendar events, travel windows and conflict alerts
//! - Trip: constraints, scored options and stored trips
//! - Budget: ledger entries and forecasts
//! - Destination: the catalog the optimizer scores

pub mod academic;
pub mod budget;
pub mod destination;
pub mod trip;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Re-export all public types for convenient access
pub use academic::{AcademicEvent, AcademicEventType, ConflictAlert, TravelWindow, parse_date};
pub use budget::{Affordability, BudgetEntry, DEFAULT_CURRENCY, ForecastResult};
pub use destination::DestinationCatalogEntry;
pub use trip::{
    StayKind, StayOption, TransportMode, TransportOption, Trip, TripConstraint, TripOption,
};

/// Three-tier risk classification shared by trip options and calendar conflicts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    Info,
    Warning,
    HighRisk,
}

/// Generate a record id such as `opt-3f2c…`
#[must_use]
pub fn new_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}
