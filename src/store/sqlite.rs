//! SQLite storage backend
//!
//! A single connection sits behind a mutex; every query runs on the blocking
//! thread pool so async callers never stall the runtime. List-valued columns
//! (tags, members, itinerary, conflicts) are stored as JSON text.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, Transaction, params};
use tokio::task;
use tracing::debug;

use super::DataStore;
use super::seed::SeedData;
use crate::models::{
    AcademicEvent, AcademicEventType, BudgetEntry, DestinationCatalogEntry, TravelWindow, Trip,
    new_id,
};
use crate::{PlannerError, Result};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS academic_events (
    id TEXT PRIMARY KEY,
    type TEXT NOT NULL,
    title TEXT NOT NULL,
    start_date TEXT NOT NULL,
    end_date TEXT NOT NULL,
    priority INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS travel_windows (
    id TEXT PRIMARY KEY,
    start_date TEXT NOT NULL,
    end_date TEXT NOT NULL,
    score INTEGER NOT NULL,
    conflicts TEXT NOT NULL DEFAULT '[]'
);
CREATE TABLE IF NOT EXISTS trips (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL,
    destination TEXT NOT NULL,
    window_id TEXT NOT NULL,
    members TEXT NOT NULL DEFAULT '[]',
    itinerary TEXT NOT NULL DEFAULT '[]',
    estimated_cost REAL NOT NULL
);
CREATE TABLE IF NOT EXISTS budget_entries (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    category TEXT NOT NULL,
    amount REAL NOT NULL,
    currency TEXT NOT NULL,
    date TEXT NOT NULL,
    trip_id TEXT,
    note TEXT
);
CREATE INDEX IF NOT EXISTS budget_entries_user ON budget_entries (user_id);
CREATE TABLE IF NOT EXISTS monthly_budgets (
    user_id TEXT PRIMARY KEY,
    budget REAL NOT NULL
);
CREATE TABLE IF NOT EXISTS destinations (
    city TEXT PRIMARY KEY,
    base_travel_hrs REAL NOT NULL,
    transport_base REAL NOT NULL,
    hostel_night_eur REAL NOT NULL,
    tags TEXT NOT NULL DEFAULT '[]'
);
";

pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) the database file, creating the schema when missing
    pub fn open(path: impl AsRef<Path>, seed_demo_data: bool) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Self::init(Connection::open(path)?, seed_demo_data)
    }

    /// Private database that disappears with the store
    pub fn open_in_memory(seed_demo_data: bool) -> Result<Self> {
        Self::init(Connection::open_in_memory()?, seed_demo_data)
    }

    fn init(mut conn: Connection, seed_demo_data: bool) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        if seed_demo_data {
            let tx = conn.transaction()?;
            seed_empty_tables(&tx, &SeedData::demo())?;
            tx.commit()?;
        }
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn with_connection<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| PlannerError::storage("SQLite connection lock poisoned"))?;
            f(&mut guard)
        })
        .await
        .map_err(|e| PlannerError::storage(format!("SQLite task failed: {e}")))?
    }
}

fn table_is_empty(tx: &Transaction<'_>, table: &str) -> Result<bool> {
    let count: i64 = tx.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
        row.get(0)
    })?;
    Ok(count == 0)
}

fn seed_empty_tables(tx: &Transaction<'_>, seed: &SeedData) -> Result<()> {
    if table_is_empty(tx, "academic_events")? {
        for event in &seed.academic_events {
            insert_event(tx, event)?;
        }
    }
    if table_is_empty(tx, "travel_windows")? {
        for window in &seed.travel_windows {
            tx.execute(
                "INSERT INTO travel_windows (id, start_date, end_date, score, conflicts)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    window.id,
                    window.start_date,
                    window.end_date,
                    window.score,
                    serde_json::to_string(&window.conflicts)?
                ],
            )?;
        }
    }
    if table_is_empty(tx, "trips")? {
        for trip in &seed.trips {
            tx.execute(
                "INSERT INTO trips
                 (id, owner_id, destination, window_id, members, itinerary, estimated_cost)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    trip.id,
                    trip.owner_id,
                    trip.destination,
                    trip.window_id,
                    serde_json::to_string(&trip.members)?,
                    serde_json::to_string(&trip.itinerary)?,
                    trip.estimated_cost
                ],
            )?;
        }
    }
    if table_is_empty(tx, "budget_entries")? {
        for entry in &seed.budget_entries {
            insert_budget_entry(tx, entry)?;
        }
    }
    if table_is_empty(tx, "monthly_budgets")? {
        for (user_id, budget) in &seed.monthly_budgets {
            tx.execute(
                "INSERT INTO monthly_budgets (user_id, budget) VALUES (?1, ?2)",
                params![user_id, budget],
            )?;
        }
    }
    if table_is_empty(tx, "destinations")? {
        for destination in &seed.destinations {
            tx.execute(
                "INSERT INTO destinations
                 (city, base_travel_hrs, transport_base, hostel_night_eur, tags)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    destination.city,
                    destination.base_travel_hours,
                    destination.transport_base,
                    destination.hostel_night_eur,
                    serde_json::to_string(&destination.tags)?
                ],
            )?;
        }
    }
    Ok(())
}

fn insert_event(conn: &Connection, event: &AcademicEvent) -> Result<()> {
    conn.execute(
        "INSERT INTO academic_events (id, type, title, start_date, end_date, priority)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6) ON CONFLICT (id) DO NOTHING",
        params![
            event.id,
            event.event_type.as_str(),
            event.title,
            event.start,
            event.end,
            event.priority
        ],
    )?;
    Ok(())
}

fn insert_budget_entry(conn: &Connection, entry: &BudgetEntry) -> Result<()> {
    let optional = |value: &str| (!value.is_empty()).then(|| value.to_string());
    conn.execute(
        "INSERT INTO budget_entries (id, user_id, category, amount, currency, date, trip_id, note)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            entry.id,
            entry.user_id,
            entry.category,
            entry.amount,
            entry.currency,
            entry.date,
            optional(&entry.trip_id),
            optional(&entry.note)
        ],
    )?;
    Ok(())
}

/// Read a JSON string-array column
fn json_list(row: &Row<'_>, idx: usize) -> rusqlite::Result<Vec<String>> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn event_from_row(row: &Row<'_>) -> rusqlite::Result<AcademicEvent> {
    let event_type: String = row.get(1)?;
    Ok(AcademicEvent {
        id: row.get(0)?,
        event_type: AcademicEventType::from(event_type.as_str()),
        title: row.get(2)?,
        start: row.get(3)?,
        end: row.get(4)?,
        priority: row.get(5)?,
    })
}

fn window_from_row(row: &Row<'_>) -> rusqlite::Result<TravelWindow> {
    Ok(TravelWindow {
        id: row.get(0)?,
        start_date: row.get(1)?,
        end_date: row.get(2)?,
        score: row.get(3)?,
        conflicts: json_list(row, 4)?,
    })
}

fn trip_from_row(row: &Row<'_>) -> rusqlite::Result<Trip> {
    Ok(Trip {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        destination: row.get(2)?,
        window_id: row.get(3)?,
        members: json_list(row, 4)?,
        itinerary: json_list(row, 5)?,
        estimated_cost: row.get(6)?,
    })
}

fn budget_entry_from_row(row: &Row<'_>) -> rusqlite::Result<BudgetEntry> {
    Ok(BudgetEntry {
        id: row.get(0)?,
        user_id: row.get(1)?,
        category: row.get(2)?,
        amount: row.get(3)?,
        currency: row.get(4)?,
        date: row.get(5)?,
        trip_id: row.get(6)?,
        note: row.get(7)?,
    })
}

fn destination_from_row(row: &Row<'_>) -> rusqlite::Result<DestinationCatalogEntry> {
    Ok(DestinationCatalogEntry {
        city: row.get(0)?,
        base_travel_hours: row.get(1)?,
        transport_base: row.get(2)?,
        hostel_night_eur: row.get(3)?,
        tags: json_list(row, 4)?,
    })
}

const TRIP_COLUMNS: &str =
    "SELECT id, owner_id, destination, window_id, members, itinerary, estimated_cost FROM trips";

fn select_trip(conn: &Connection, id: &str) -> Result<Option<Trip>> {
    Ok(conn
        .query_row(&format!("{TRIP_COLUMNS} WHERE id = ?1"), [id], trip_from_row)
        .optional()?)
}

fn select_events(conn: &Connection) -> Result<Vec<AcademicEvent>> {
    let mut stmt = conn.prepare(
        "SELECT id, type, title, start_date, end_date, priority
         FROM academic_events ORDER BY start_date, rowid",
    )?;
    let events = stmt
        .query_map([], event_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(events)
}

#[async_trait]
impl DataStore for SqliteStore {
    #[tracing::instrument(level = "debug", skip_all, fields(count = events.len()))]
    async fn import_academic_events(
        &self,
        events: Vec<AcademicEvent>,
    ) -> Result<Vec<AcademicEvent>> {
        self.with_connection(move |conn| {
            let tx = conn.transaction()?;
            for mut event in events {
                if event.id.is_empty() {
                    event.id = new_id("ev");
                }
                insert_event(&tx, &event)?;
            }
            tx.commit()?;
            select_events(conn)
        })
        .await
    }

    async fn list_academic_events(&self) -> Result<Vec<AcademicEvent>> {
        self.with_connection(|conn| select_events(conn)).await
    }

    async fn list_travel_windows(
        &self,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Vec<TravelWindow>> {
        let from = from.map(str::to_string);
        let to = to.map(str::to_string);
        self.with_connection(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, start_date, end_date, score, conflicts FROM travel_windows
                 WHERE (?1 IS NULL OR end_date >= ?1) AND (?2 IS NULL OR start_date <= ?2)
                 ORDER BY start_date",
            )?;
            let windows = stmt
                .query_map(params![from, to], window_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(windows)
        })
        .await
    }

    async fn travel_window(&self, id: &str) -> Result<Option<TravelWindow>> {
        let id = id.to_string();
        self.with_connection(move |conn| {
            Ok(conn
                .query_row(
                    "SELECT id, start_date, end_date, score, conflicts
                     FROM travel_windows WHERE id = ?1",
                    [&id],
                    window_from_row,
                )
                .optional()?)
        })
        .await
    }

    async fn list_destinations(&self) -> Result<Vec<DestinationCatalogEntry>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT city, base_travel_hrs, transport_base, hostel_night_eur, tags
                 FROM destinations ORDER BY rowid",
            )?;
            let destinations = stmt
                .query_map([], destination_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            debug!("Loaded {} destinations", destinations.len());
            Ok(destinations)
        })
        .await
    }

    async fn trip(&self, id: &str) -> Result<Option<Trip>> {
        let id = id.to_string();
        self.with_connection(move |conn| select_trip(conn, &id)).await
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn share_trip(&self, trip_id: &str, member_ids: Vec<String>) -> Result<Option<Trip>> {
        let trip_id = trip_id.to_string();
        self.with_connection(move |conn| {
            let tx = conn.transaction()?;
            let Some(mut trip) = select_trip(&tx, &trip_id)? else {
                return Ok(None);
            };
            trip.add_members(member_ids);
            tx.execute(
                "UPDATE trips SET members = ?1 WHERE id = ?2",
                params![serde_json::to_string(&trip.members)?, trip.id],
            )?;
            tx.commit()?;
            Ok(Some(trip))
        })
        .await
    }

    async fn add_budget_entry(&self, mut entry: BudgetEntry) -> Result<BudgetEntry> {
        entry.id = new_id("b");
        self.with_connection(move |conn| {
            insert_budget_entry(conn, &entry)?;
            Ok(entry)
        })
        .await
    }

    async fn list_budget_entries(&self, user_id: &str) -> Result<Vec<BudgetEntry>> {
        let user_id = user_id.to_string();
        self.with_connection(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, category, amount, currency, date,
                        COALESCE(trip_id, ''), COALESCE(note, '')
                 FROM budget_entries WHERE user_id = ?1 ORDER BY date, rowid",
            )?;
            let entries = stmt
                .query_map([&user_id], budget_entry_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(entries)
        })
        .await
    }

    async fn monthly_budget(&self, user_id: &str) -> Result<Option<f64>> {
        let user_id = user_id.to_string();
        self.with_connection(move |conn| {
            Ok(conn
                .query_row(
                    "SELECT budget FROM monthly_budgets WHERE user_id = ?1",
                    [&user_id],
                    |row| row.get(0),
                )
                .optional()?)
        })
        .await
    }
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore").finish_non_exhaustive()
    }
}
