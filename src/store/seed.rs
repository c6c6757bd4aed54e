//! Demo records both backends start with

use crate::models::{
    AcademicEvent, AcademicEventType, BudgetEntry, DEFAULT_CURRENCY, DestinationCatalogEntry,
    TravelWindow, Trip,
};

pub const DEMO_USER: &str = "demo-user";

/// Everything a freshly seeded store contains
#[derive(Debug, Clone)]
pub struct SeedData {
    pub academic_events: Vec<AcademicEvent>,
    pub travel_windows: Vec<TravelWindow>,
    pub trips: Vec<Trip>,
    pub budget_entries: Vec<BudgetEntry>,
    pub monthly_budgets: Vec<(String, f64)>,
    pub destinations: Vec<DestinationCatalogEntry>,
}

fn event(
    id: &str,
    event_type: AcademicEventType,
    title: &str,
    start: &str,
    end: &str,
    priority: i32,
) -> AcademicEvent {
    AcademicEvent {
        id: id.to_string(),
        event_type,
        title: title.to_string(),
        start: start.to_string(),
        end: end.to_string(),
        priority,
    }
}

fn window(id: &str, start: &str, end: &str, score: i32, conflicts: &[&str]) -> TravelWindow {
    TravelWindow {
        id: id.to_string(),
        start_date: start.to_string(),
        end_date: end.to_string(),
        score,
        conflicts: conflicts.iter().map(|c| (*c).to_string()).collect(),
    }
}

fn entry(id: &str, category: &str, amount: f64, date: &str, note: &str) -> BudgetEntry {
    BudgetEntry {
        id: id.to_string(),
        user_id: DEMO_USER.to_string(),
        category: category.to_string(),
        amount,
        currency: DEFAULT_CURRENCY.to_string(),
        date: date.to_string(),
        trip_id: String::new(),
        note: note.to_string(),
    }
}

impl SeedData {
    #[must_use]
    pub fn demo() -> Self {
        Self {
            academic_events: vec![
                event(
                    "ev-1",
                    AcademicEventType::Exam,
                    "Economics Midterm",
                    "2026-03-18",
                    "2026-03-18",
                    5,
                ),
                event(
                    "ev-2",
                    AcademicEventType::Deadline,
                    "Group Project Deadline",
                    "2026-03-24",
                    "2026-03-24",
                    4,
                ),
                event(
                    "ev-3",
                    AcademicEventType::Holiday,
                    "Public Holiday",
                    "2026-04-03",
                    "2026-04-05",
                    1,
                ),
            ],
            travel_windows: vec![
                window("w-1", "2026-03-06", "2026-03-08", 88, &[]),
                window("w-2", "2026-03-20", "2026-03-22", 52, &["Near major deadline"]),
                window("w-3", "2026-04-03", "2026-04-06", 95, &[]),
            ],
            trips: vec![Trip {
                id: "trip-1".to_string(),
                owner_id: DEMO_USER.to_string(),
                destination: "Prague".to_string(),
                window_id: "w-1".to_string(),
                members: vec![DEMO_USER.to_string()],
                itinerary: vec!["Old Town walk".to_string(), "Charles Bridge sunrise".to_string()],
                estimated_cost: 220.0,
            }],
            budget_entries: vec![
                entry("b-1", "living", 420.0, "2026-02-05", "Rent split"),
                entry("b-2", "travel", 60.0, "2026-02-08", "Train to Vienna"),
            ],
            monthly_budgets: vec![(DEMO_USER.to_string(), 900.0)],
            destinations: vec![
                DestinationCatalogEntry::new("Prague", 3.8, 55.0, 28.0, &["culture", "city"]),
                DestinationCatalogEntry::new("Budapest", 4.7, 47.0, 24.0, &["nightlife", "city"]),
                DestinationCatalogEntry::new("Ljubljana", 5.2, 41.0, 30.0, &["nature", "city"]),
                DestinationCatalogEntry::new("Krakow", 2.9, 50.0, 22.0, &["culture", "city"]),
            ],
        }
    }
}
