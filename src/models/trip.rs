//! Trip constraints, scored trip options and stored trips

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::Severity;

/// Traveller-supplied scoring input.
///
/// Every field defaults to its zero value when the client leaves it out;
/// scoring treats zeroes permissively rather than rejecting the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TripConstraint {
    pub budget_cap: f64,
    pub max_travel_hours: f64,
    pub party_size: i32,
    pub style: String,
    pub window_id: String,
    pub departure_city: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Train,
    Bus,
    Flight,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportOption {
    pub provider: String,
    pub mode: TransportMode,
    pub duration_hours: f64,
    pub price: f64,
    pub deeplink: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StayKind {
    Hostel,
    BudgetHotel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StayOption {
    pub provider: String,
    pub kind: StayKind,
    pub nightly_price: f64,
    pub rating: f64,
    pub deeplink: String,
}

/// One ranked destination proposal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripOption {
    pub id: String,
    pub destination: String,
    pub reason_tags: Vec<String>,
    pub total_estimated_cost: f64,
    pub transport_options: Vec<TransportOption>,
    pub stay_options: Vec<StayOption>,
    pub risk_level: Severity,
}

/// A planned trip shared between exchange students
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: String,
    pub owner_id: String,
    pub destination: String,
    pub window_id: String,
    pub members: Vec<String>,
    pub itinerary: Vec<String>,
    pub estimated_cost: f64,
}

impl Trip {
    /// Add members to the trip, keeping the list unique and sorted.
    /// Blank ids are ignored.
    pub fn add_members<I, S>(&mut self, member_ids: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut merged: BTreeSet<String> = self.members.drain(..).collect();
        merged.extend(
            member_ids
                .into_iter()
                .map(|id| id.as_ref().to_string())
                .filter(|id| !id.is_empty()),
        );
        self.members = merged.into_iter().collect();
    }
}
