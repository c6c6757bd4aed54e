//! Persistence for calendar, trip and budget records
//!
//! The service talks to storage only through [`DataStore`]. Two backends
//! implement it with identical behaviour: [`MemoryStore`] for local runs and
//! tests, and [`SqliteStore`] for a persistent database file.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::Result;
use crate::config::StorageConfig;
use crate::models::{AcademicEvent, BudgetEntry, DestinationCatalogEntry, TravelWindow, Trip};

pub mod memory;
pub mod seed;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

#[async_trait]
pub trait DataStore: Send + Sync {
    /// Store the given events, assigning ids to those without one, and return
    /// every known event. Events whose id is already stored are ignored.
    /// Event lists are ordered by start date.
    async fn import_academic_events(&self, events: Vec<AcademicEvent>)
    -> Result<Vec<AcademicEvent>>;

    async fn list_academic_events(&self) -> Result<Vec<AcademicEvent>>;

    /// Windows overlapping the optional `[from, to]` range; all windows when
    /// neither bound is given. Ordered by start date.
    async fn list_travel_windows(
        &self,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Vec<TravelWindow>>;

    async fn travel_window(&self, id: &str) -> Result<Option<TravelWindow>>;

    async fn list_destinations(&self) -> Result<Vec<DestinationCatalogEntry>>;

    async fn trip(&self, id: &str) -> Result<Option<Trip>>;

    /// Merge members into a trip. `None` when the trip does not exist.
    async fn share_trip(&self, trip_id: &str, member_ids: Vec<String>) -> Result<Option<Trip>>;

    /// Store a ledger entry under a freshly generated id
    async fn add_budget_entry(&self, entry: BudgetEntry) -> Result<BudgetEntry>;

    async fn list_budget_entries(&self, user_id: &str) -> Result<Vec<BudgetEntry>>;

    async fn monthly_budget(&self, user_id: &str) -> Result<Option<f64>>;
}

/// Open the backend selected by the storage configuration
pub fn open(config: &StorageConfig) -> Result<Arc<dyn DataStore>> {
    match &config.database_path {
        Some(path) => {
            info!("Using SQLite store at {}", path.display());
            Ok(Arc::new(SqliteStore::open(path, config.seed_demo_data)?))
        }
        None => {
            info!("Using in-memory store (set storage.database_path for SQLite)");
            let store = if config.seed_demo_data {
                MemoryStore::seeded()
            } else {
                MemoryStore::empty()
            };
            Ok(Arc::new(store))
        }
    }
}
