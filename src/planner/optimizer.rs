//! Destination scoring for trip proposals
//!
//! Ranks every catalog destination against a traveller's budget, travel time
//! and style preference, and derives the transport and lodging quotes shown
//! alongside each proposal.

use tracing::debug;

use crate::models::{
    DestinationCatalogEntry, Severity, StayKind, StayOption, TransportMode, TransportOption,
    TripConstraint, TripOption, new_id,
};

use super::round_to;

const BASE_SCORE: f64 = 100.0;
const STYLE_BOOST: f64 = 14.0;
const DURATION_PENALTY_PER_HOUR: f64 = 18.0;
const BUDGET_PENALTY_DIVISOR: f64 = 3.0;
const TRANSPORT_SURCHARGE_PER_TRAVELLER: f64 = 7.0;
const NIGHTS: f64 = 2.0;

pub const TAG_SHORT_TRANSIT: &str = "short-transit";
pub const TAG_WITHIN_BUDGET: &str = "within-budget";
pub const TAG_STYLE_MATCH: &str = "style-match";
pub const TAG_STRETCH_CHOICE: &str = "stretch-choice";

/// Intermediate figures for one destination before ranking
#[derive(Debug, Clone, PartialEq)]
pub struct DestinationScore {
    pub score: f64,
    pub style_boost: f64,
    pub transport_price: f64,
    pub total_cost: f64,
}

impl DestinationScore {
    #[must_use]
    pub fn calculate(entry: &DestinationCatalogEntry, constraint: &TripConstraint) -> Self {
        let style_boost = if entry.tags.iter().any(|tag| *tag == constraint.style) {
            STYLE_BOOST
        } else {
            0.0
        };
        let party_size = f64::from(constraint.party_size);

        let duration_penalty = (entry.base_travel_hours - constraint.max_travel_hours).max(0.0)
            * DURATION_PENALTY_PER_HOUR;
        let transport_price = entry.transport_base + party_size * TRANSPORT_SURCHARGE_PER_TRAVELLER;
        let stay_price = entry.hostel_night_eur * NIGHTS * party_size;
        let total_cost = (transport_price + stay_price).round();

        let budget_penalty = if total_cost > constraint.budget_cap {
            (total_cost - constraint.budget_cap) / BUDGET_PENALTY_DIVISOR
        } else {
            0.0
        };

        Self {
            score: BASE_SCORE + style_boost - duration_penalty - budget_penalty,
            style_boost,
            transport_price,
            total_cost,
        }
    }

    #[must_use]
    pub fn risk_level(&self, constraint: &TripConstraint) -> Severity {
        if self.total_cost > constraint.budget_cap {
            Severity::Warning
        } else {
            Severity::Info
        }
    }

    /// Reason tags in display order, never empty
    #[must_use]
    pub fn reason_tags(
        &self,
        entry: &DestinationCatalogEntry,
        constraint: &TripConstraint,
    ) -> Vec<String> {
        let mut tags = Vec::with_capacity(3);
        if entry.base_travel_hours <= constraint.max_travel_hours {
            tags.push(TAG_SHORT_TRANSIT.to_string());
        }
        if self.total_cost <= constraint.budget_cap {
            tags.push(TAG_WITHIN_BUDGET.to_string());
        }
        if self.style_boost > 0.0 {
            tags.push(TAG_STYLE_MATCH.to_string());
        }
        if tags.is_empty() {
            tags.push(TAG_STRETCH_CHOICE.to_string());
        }
        tags
    }
}

fn transport_options(
    entry: &DestinationCatalogEntry,
    transport_price: f64,
) -> Vec<TransportOption> {
    vec![
        TransportOption {
            provider: "EuroRail Connect".to_string(),
            mode: TransportMode::Train,
            duration_hours: round_to(entry.base_travel_hours, 1),
            price: (transport_price * 0.92).round(),
            deeplink: "https://example.com/train".to_string(),
        },
        TransportOption {
            provider: "BudgetBus Europe".to_string(),
            mode: TransportMode::Bus,
            duration_hours: round_to(entry.base_travel_hours * 1.3, 1),
            price: (transport_price * 0.76).round(),
            deeplink: "https://example.com/bus".to_string(),
        },
    ]
}

fn stay_options(entry: &DestinationCatalogEntry) -> Vec<StayOption> {
    vec![
        StayOption {
            provider: "HostelGraph".to_string(),
            kind: StayKind::Hostel,
            nightly_price: entry.hostel_night_eur,
            rating: 4.3,
            deeplink: "https://example.com/hostel".to_string(),
        },
        StayOption {
            provider: "StudentStay".to_string(),
            kind: StayKind::BudgetHotel,
            nightly_price: entry.hostel_night_eur + 16.0,
            rating: 4.0,
            deeplink: "https://example.com/hotel".to_string(),
        },
    ]
}

/// Score every catalog destination and return the proposals best-first.
///
/// Equal scores keep catalog order.
#[must_use]
pub fn score_destinations(
    constraint: &TripConstraint,
    catalog: &[DestinationCatalogEntry],
) -> Vec<TripOption> {
    let mut scored: Vec<(f64, TripOption)> = catalog
        .iter()
        .map(|entry| {
            let figures = DestinationScore::calculate(entry, constraint);
            debug!(
                "Scored {}: score={:.2} total={}",
                entry.city, figures.score, figures.total_cost
            );
            let option = TripOption {
                id: new_id("opt"),
                destination: entry.city.clone(),
                reason_tags: figures.reason_tags(entry, constraint),
                total_estimated_cost: figures.total_cost,
                transport_options: transport_options(entry, figures.transport_price),
                stay_options: stay_options(entry),
                risk_level: figures.risk_level(constraint),
            };
            (figures.score, option)
        })
        .collect();

    // sort_by is stable, so ties stay in catalog order
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.into_iter().map(|(_, option)| option).collect()
}
