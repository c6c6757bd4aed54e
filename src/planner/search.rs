//! Catalog-backed transport and lodging quotes
//!
//! Used directly by the stay search and as the fallback when the external
//! transport provider is disabled or returns nothing.

use crate::models::{
    DestinationCatalogEntry, StayKind, StayOption, TransportMode, TransportOption,
};

use super::round_to;

/// Quote the train and flight connections to `to`, or nothing for an unknown city
#[must_use]
pub fn transport_quotes(catalog: &[DestinationCatalogEntry], to: &str) -> Vec<TransportOption> {
    let Some(entry) = catalog.iter().find(|entry| entry.is_city(to)) else {
        return Vec::new();
    };

    vec![
        TransportOption {
            provider: "EuroRail Connect".to_string(),
            mode: TransportMode::Train,
            duration_hours: entry.base_travel_hours,
            price: (entry.transport_base * 0.9).round(),
            deeplink: "https://example.com/train".to_string(),
        },
        TransportOption {
            provider: "SkySaver".to_string(),
            mode: TransportMode::Flight,
            duration_hours: round_to(entry.base_travel_hours * 0.65, 1),
            price: (entry.transport_base * 1.18).round(),
            deeplink: "https://example.com/flight".to_string(),
        },
    ]
}

/// Quote hostel and budget-hotel stays in `city`, or nothing for an unknown city
#[must_use]
pub fn stay_quotes(catalog: &[DestinationCatalogEntry], city: &str) -> Vec<StayOption> {
    let Some(entry) = catalog.iter().find(|entry| entry.is_city(city)) else {
        return Vec::new();
    };

    vec![
        StayOption {
            provider: "HostelGraph".to_string(),
            kind: StayKind::Hostel,
            nightly_price: entry.hostel_night_eur,
            rating: 4.2,
            deeplink: "https://example.com/hostel".to_string(),
        },
        StayOption {
            provider: "StudentStay".to_string(),
            kind: StayKind::BudgetHotel,
            nightly_price: entry.hostel_night_eur + 14.0,
            rating: 4.0,
            deeplink: "https://example.com/hotel".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<DestinationCatalogEntry> {
        vec![
            DestinationCatalogEntry::new("Prague", 3.8, 55.0, 28.0, &["culture"]),
            DestinationCatalogEntry::new("Budapest", 4.7, 47.0, 24.0, &["nightlife"]),
        ]
    }

    #[test]
    fn test_transport_quotes_for_known_city() {
        let quotes = transport_quotes(&catalog(), "prague");
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].mode, TransportMode::Train);
        assert_eq!(quotes[0].duration_hours, 3.8);
        assert_eq!(quotes[0].price, 50.0);
        assert_eq!(quotes[1].provider, "SkySaver");
        assert_eq!(quotes[1].duration_hours, 2.5);
        assert_eq!(quotes[1].price, 65.0);
    }

    #[test]
    fn test_stay_quotes_for_known_city() {
        let quotes = stay_quotes(&catalog(), "Budapest");
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].rating, 4.2);
        assert_eq!(quotes[1].nightly_price, 38.0);
    }

    #[test]
    fn test_unknown_city_has_no_quotes() {
        assert!(transport_quotes(&catalog(), "Tokyo").is_empty());
        assert!(stay_quotes(&catalog(), "Tokyo").is_empty());
    }
}
