//! Planner service: storage, live transport search and budget policy behind
//! one async API, one method per HTTP operation.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::models::{
    AcademicEvent, BudgetEntry, ConflictAlert, DEFAULT_CURRENCY, ForecastResult, StayOption,
    TransportOption, TravelWindow, Trip, TripConstraint, TripOption,
};
use crate::provider::TransportProvider;
use crate::store::DataStore;
use crate::{PlannerError, Result};

use super::{
    BudgetPolicy, evaluate_conflicts, forecast_budget, score_destinations, stay_quotes,
    transport_quotes,
};

#[derive(Clone)]
pub struct Planner {
    store: Arc<dyn DataStore>,
    transport: Option<Arc<dyn TransportProvider>>,
    budget_policy: BudgetPolicy,
}

impl std::fmt::Debug for Planner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Planner")
            .field("transport", &self.transport.is_some())
            .field("budget_policy", &self.budget_policy)
            .finish_non_exhaustive()
    }
}

impl Planner {
    #[must_use]
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self {
            store,
            transport: None,
            budget_policy: BudgetPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_transport_provider(mut self, provider: Arc<dyn TransportProvider>) -> Self {
        self.transport = Some(provider);
        self
    }

    #[must_use]
    pub fn with_budget_policy(mut self, policy: BudgetPolicy) -> Self {
        self.budget_policy = policy;
        self
    }

    #[tracing::instrument(skip_all, fields(count = events.len()))]
    pub async fn import_events(&self, events: Vec<AcademicEvent>) -> Result<Vec<AcademicEvent>> {
        let all = self.store.import_academic_events(events).await?;
        info!("Calendar now holds {} events", all.len());
        Ok(all)
    }

    pub async fn travel_windows(
        &self,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Vec<TravelWindow>> {
        self.store.list_travel_windows(from, to).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn optimize_trips(&self, constraint: &TripConstraint) -> Result<Vec<TripOption>> {
        let catalog = self.store.list_destinations().await?;
        let options = score_destinations(constraint, &catalog);
        info!("Scored {} destinations", options.len());
        Ok(options)
    }

    pub async fn trip(&self, id: &str) -> Result<Trip> {
        self.store
            .trip(id)
            .await?
            .ok_or_else(|| PlannerError::not_found("trip not found"))
    }

    #[tracing::instrument(skip(self))]
    pub async fn share_trip(&self, trip_id: &str, member_ids: Vec<String>) -> Result<Trip> {
        self.store
            .share_trip(trip_id, member_ids)
            .await?
            .ok_or_else(|| PlannerError::not_found("trip not found"))
    }

    /// Record a ledger entry for `user_id`, defaulting the currency
    #[tracing::instrument(skip(self, entry), fields(category = %entry.category))]
    pub async fn add_budget_entry(
        &self,
        user_id: &str,
        mut entry: BudgetEntry,
    ) -> Result<BudgetEntry> {
        entry.user_id = user_id.to_string();
        if entry.currency.is_empty() {
            entry.currency = DEFAULT_CURRENCY.to_string();
        }
        if !entry.is_complete() {
            return Err(PlannerError::validation("missing required fields"));
        }
        self.store.add_budget_entry(entry).await
    }

    pub async fn budget_entries(&self, user_id: &str) -> Result<Vec<BudgetEntry>> {
        self.store.list_budget_entries(user_id).await
    }

    /// Forecast the month for `user_id`, optionally including a planned trip.
    /// Unknown trips count as free.
    #[tracing::instrument(skip(self))]
    pub async fn forecast(&self, user_id: &str, trip_id: Option<&str>) -> Result<ForecastResult> {
        let entries = self.store.list_budget_entries(user_id).await?;
        let monthly_budget = self.store.monthly_budget(user_id).await?;

        let trip_cost = match trip_id.filter(|id| !id.is_empty()) {
            Some(id) => self
                .store
                .trip(id)
                .await?
                .map_or(0.0, |trip| trip.estimated_cost),
            None => 0.0,
        };

        Ok(forecast_budget(
            &entries,
            monthly_budget,
            trip_cost,
            &self.budget_policy,
        ))
    }

    /// Alerts for academic events inside the window; none for unknown windows
    #[tracing::instrument(skip(self))]
    pub async fn evaluate_conflicts(&self, window_id: &str) -> Result<Vec<ConflictAlert>> {
        let window = self.store.travel_window(window_id).await?;
        if window.is_none() {
            debug!("Travel window {} not found", window_id);
        }
        let events = self.store.list_academic_events().await?;
        Ok(evaluate_conflicts(window.as_ref(), &events))
    }

    /// Live provider results when available, catalog quotes otherwise
    #[tracing::instrument(skip(self))]
    pub async fn search_transport(&self, from: &str, to: &str) -> Result<Vec<TransportOption>> {
        if let Some(provider) = &self.transport {
            match provider.search_transport(from, to).await {
                Ok(options) if !options.is_empty() => return Ok(options),
                Ok(_) => debug!("Transport provider returned nothing, using catalog"),
                Err(e) => warn!("Transport provider failed, using catalog: {}", e),
            }
        }
        let catalog = self.store.list_destinations().await?;
        Ok(transport_quotes(&catalog, to))
    }

    pub async fn search_stays(&self, city: &str) -> Result<Vec<StayOption>> {
        let catalog = self.store.list_destinations().await?;
        Ok(stay_quotes(&catalog, city))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Affordability, Severity, TransportMode};
    use crate::store::MemoryStore;
    use crate::store::seed::DEMO_USER;
    use async_trait::async_trait;

    fn planner() -> Planner {
        Planner::new(Arc::new(MemoryStore::seeded()))
    }

    struct FixedProvider(Result<Vec<TransportOption>>);

    #[async_trait]
    impl TransportProvider for FixedProvider {
        async fn search_transport(&self, _from: &str, _to: &str) -> Result<Vec<TransportOption>> {
            match &self.0 {
                Ok(options) => Ok(options.clone()),
                Err(e) => Err(PlannerError::provider(e.to_string())),
            }
        }
    }

    fn live_option() -> TransportOption {
        TransportOption {
            provider: "OpenTransportData".into(),
            mode: TransportMode::Bus,
            duration_hours: 5.0,
            price: 98.0,
            deeplink: "http://localhost/connections?to=Prague".into(),
        }
    }

    #[tokio::test]
    async fn test_optimize_returns_one_option_per_destination() {
        let options = planner()
            .optimize_trips(&TripConstraint {
                budget_cap: 300.0,
                max_travel_hours: 6.0,
                party_size: 1,
                style: "culture".into(),
                ..TripConstraint::default()
            })
            .await
            .unwrap();
        assert_eq!(options.len(), 4);
        assert_eq!(options[0].destination, "Prague");
    }

    #[tokio::test]
    async fn test_trip_not_found() {
        let err = planner().trip("nonexistent").await.unwrap_err();
        assert!(matches!(err, PlannerError::NotFound { .. }));
        assert_eq!(err.user_message(), "trip not found");
    }

    #[tokio::test]
    async fn test_share_unknown_trip() {
        let err = planner()
            .share_trip("nope", vec!["alice".into()])
            .await
            .unwrap_err();
        assert!(matches!(err, PlannerError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_add_budget_entry_defaults_currency() {
        let entry = planner()
            .add_budget_entry(
                DEMO_USER,
                BudgetEntry {
                    category: "food".into(),
                    amount: 12.5,
                    date: "2026-03-02".into(),
                    ..BudgetEntry::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(entry.currency, "EUR");
        assert_eq!(entry.user_id, DEMO_USER);
        assert!(entry.id.starts_with("b-"));
    }

    #[tokio::test]
    async fn test_add_budget_entry_rejects_incomplete() {
        let err = planner()
            .add_budget_entry(
                DEMO_USER,
                BudgetEntry {
                    category: "food".into(),
                    amount: 0.0,
                    date: "2026-03-02".into(),
                    ..BudgetEntry::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "missing required fields");
    }

    #[tokio::test]
    async fn test_forecast_with_and_without_trip() {
        let planner = planner();

        let plain = planner.forecast(DEMO_USER, None).await.unwrap();
        assert_eq!(plain.projected_monthly_spend, 480.0);
        assert_eq!(plain.remaining_budget, 420.0);
        assert_eq!(plain.affordability, Affordability::Green);

        let with_trip = planner.forecast(DEMO_USER, Some("trip-1")).await.unwrap();
        assert_eq!(with_trip.projected_monthly_spend, 700.0);
        assert_eq!(with_trip.remaining_budget, 200.0);
        assert_eq!(with_trip.affordability, Affordability::Green);

        let unknown_trip = planner.forecast(DEMO_USER, Some("nope")).await.unwrap();
        assert_eq!(unknown_trip.projected_monthly_spend, 480.0);
    }

    #[tokio::test]
    async fn test_forecast_respects_policy() {
        let planner = planner().with_budget_policy(BudgetPolicy {
            default_monthly_budget: 500.0,
            amber_threshold: 450.0,
        });

        // seeded user keeps their own 900 budget
        let seeded = planner.forecast(DEMO_USER, None).await.unwrap();
        assert_eq!(seeded.affordability, Affordability::Amber);

        let stranger = planner.forecast("someone-else", None).await.unwrap();
        assert_eq!(stranger.remaining_budget, 500.0);
        assert_eq!(stranger.affordability, Affordability::Green);
    }

    #[tokio::test]
    async fn test_evaluate_conflicts_by_window_id() {
        let planner = planner();

        let alerts = planner.evaluate_conflicts("w-3").await.unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, Severity::Info);
        assert_eq!(alerts[0].related_event_id, "ev-3");

        assert!(planner.evaluate_conflicts("w-1").await.unwrap().is_empty());
        assert!(planner.evaluate_conflicts("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_transport_prefers_provider() {
        let planner = planner()
            .with_transport_provider(Arc::new(FixedProvider(Ok(vec![live_option()]))));
        let options = planner.search_transport("Berlin", "Prague").await.unwrap();
        assert_eq!(options, vec![live_option()]);
    }

    #[tokio::test]
    async fn test_search_transport_falls_back_to_catalog() {
        let failing = planner().with_transport_provider(Arc::new(FixedProvider(Err(
            PlannerError::provider("provider disabled"),
        ))));
        let options = failing.search_transport("", "prague").await.unwrap();
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].provider, "EuroRail Connect");

        let empty = planner().with_transport_provider(Arc::new(FixedProvider(Ok(Vec::new()))));
        assert_eq!(empty.search_transport("", "Prague").await.unwrap().len(), 2);

        assert!(planner().search_transport("", "Atlantis").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_stays() {
        let options = planner().search_stays("Krakow").await.unwrap();
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].nightly_price, 22.0);
        assert_eq!(options[1].nightly_price, 36.0);
    }
}
