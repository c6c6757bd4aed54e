//! Destination catalog reference data

use serde::{Deserialize, Serialize};

/// Baseline travel time and prices for a candidate destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationCatalogEntry {
    pub city: String,
    pub base_travel_hours: f64,
    pub transport_base: f64,
    #[serde(rename = "hostelNightEUR")]
    pub hostel_night_eur: f64,
    pub tags: Vec<String>,
}

impl DestinationCatalogEntry {
    #[must_use]
    pub fn new(
        city: &str,
        base_travel_hours: f64,
        transport_base: f64,
        hostel_night_eur: f64,
        tags: &[&str],
    ) -> Self {
        Self {
            city: city.to_string(),
            base_travel_hours,
            transport_base,
            hostel_night_eur,
            tags: tags.iter().map(|tag| (*tag).to_string()).collect(),
        }
    }

    /// Case-insensitive city match used by the search endpoints
    #[must_use]
    pub fn is_city(&self, city: &str) -> bool {
        self.city.to_lowercase() == city.to_lowercase()
    }
}
