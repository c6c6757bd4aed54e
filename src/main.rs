use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use exchange_planner::{
    AuthSettings, OpenTransportProvider, Planner, PlannerConfig, VERSION, store, telemetry, web,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = PlannerConfig::load().context("Failed to load configuration")?;
    telemetry::init_tracing(&config.logging);
    info!("Starting exchange-planner {}", VERSION);

    let store = store::open(&config.storage).context("Failed to open storage")?;

    let mut planner = Planner::new(store).with_budget_policy(config.budget.policy());
    if config.transport.enabled {
        let provider = OpenTransportProvider::new(&config.transport)
            .context("Failed to create transport provider")?;
        info!("Live transport search via {}", config.transport.base_url);
        planner = planner.with_transport_provider(Arc::new(provider));
    }

    let auth = AuthSettings::from_config(&config.auth);
    if auth.is_disabled() {
        info!("Authentication disabled, requests run as the demo user");
    }

    let router = web::app(Arc::new(planner), auth, &config.server);
    web::run(&config.server, router).await
}
