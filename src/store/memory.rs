//! In-memory storage backend

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::DataStore;
use super::seed::SeedData;
use crate::Result;
use crate::models::{
    AcademicEvent, BudgetEntry, DestinationCatalogEntry, TravelWindow, Trip, new_id,
};

#[derive(Debug, Default)]
struct Collections {
    academic_events: Vec<AcademicEvent>,
    travel_windows: Vec<TravelWindow>,
    trips: Vec<Trip>,
    budget_entries: Vec<BudgetEntry>,
    monthly_budgets: HashMap<String, f64>,
    destinations: Vec<DestinationCatalogEntry>,
}

impl Collections {
    /// Events by start date, ties in insertion order
    fn sorted_events(&self) -> Vec<AcademicEvent> {
        let mut events = self.academic_events.clone();
        events.sort_by(|a, b| a.start.cmp(&b.start));
        events
    }
}

/// Process-local store guarded by a reader/writer lock.
///
/// Readers get cloned snapshots so no lock is held once a call returns.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Store pre-filled with the demo records
    #[must_use]
    pub fn seeded() -> Self {
        Self::from_seed(SeedData::demo())
    }

    #[must_use]
    pub fn from_seed(seed: SeedData) -> Self {
        Self {
            inner: RwLock::new(Collections {
                academic_events: seed.academic_events,
                travel_windows: seed.travel_windows,
                trips: seed.trips,
                budget_entries: seed.budget_entries,
                monthly_budgets: seed.monthly_budgets.into_iter().collect(),
                destinations: seed.destinations,
            }),
        }
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    #[tracing::instrument(level = "debug", skip_all, fields(count = events.len()))]
    async fn import_academic_events(
        &self,
        events: Vec<AcademicEvent>,
    ) -> Result<Vec<AcademicEvent>> {
        let mut inner = self.inner.write().await;
        for mut event in events {
            if event.id.is_empty() {
                event.id = new_id("ev");
            } else if inner.academic_events.iter().any(|known| known.id == event.id) {
                debug!("Ignoring duplicate event {}", event.id);
                continue;
            }
            inner.academic_events.push(event);
        }
        Ok(inner.sorted_events())
    }

    async fn list_academic_events(&self) -> Result<Vec<AcademicEvent>> {
        Ok(self.inner.read().await.sorted_events())
    }

    async fn list_travel_windows(
        &self,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Vec<TravelWindow>> {
        let inner = self.inner.read().await;
        let mut windows: Vec<TravelWindow> = inner
            .travel_windows
            .iter()
            .filter(|window| window.overlaps(from, to))
            .cloned()
            .collect();
        windows.sort_by(|a, b| a.start_date.cmp(&b.start_date));
        Ok(windows)
    }

    async fn travel_window(&self, id: &str) -> Result<Option<TravelWindow>> {
        let inner = self.inner.read().await;
        Ok(inner.travel_windows.iter().find(|w| w.id == id).cloned())
    }

    async fn list_destinations(&self) -> Result<Vec<DestinationCatalogEntry>> {
        Ok(self.inner.read().await.destinations.clone())
    }

    async fn trip(&self, id: &str) -> Result<Option<Trip>> {
        let inner = self.inner.read().await;
        Ok(inner.trips.iter().find(|trip| trip.id == id).cloned())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn share_trip(&self, trip_id: &str, member_ids: Vec<String>) -> Result<Option<Trip>> {
        let mut inner = self.inner.write().await;
        let Some(trip) = inner.trips.iter_mut().find(|trip| trip.id == trip_id) else {
            return Ok(None);
        };
        trip.add_members(member_ids);
        Ok(Some(trip.clone()))
    }

    async fn add_budget_entry(&self, mut entry: BudgetEntry) -> Result<BudgetEntry> {
        entry.id = new_id("b");
        self.inner.write().await.budget_entries.push(entry.clone());
        Ok(entry)
    }

    async fn list_budget_entries(&self, user_id: &str) -> Result<Vec<BudgetEntry>> {
        let inner = self.inner.read().await;
        Ok(inner
            .budget_entries
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn monthly_budget(&self, user_id: &str) -> Result<Option<f64>> {
        Ok(self.inner.read().await.monthly_budgets.get(user_id).copied())
    }
}
