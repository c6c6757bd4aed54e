//! External transport search
//!
//! [`OpenTransportProvider`] queries a public-transport connections API and
//! turns each connection into a priced [`TransportOption`]. Failures surface
//! as [`PlannerError::Provider`] so callers can fall back to catalog quotes.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::TransportConfig;
use crate::models::{TransportMode, TransportOption};
use crate::planner::round_to;
use crate::{PlannerError, Result};

pub const PROVIDER_NAME: &str = "OpenTransportData";

const CONNECTION_LIMIT: &str = "3";

#[async_trait]
pub trait TransportProvider: Send + Sync {
    /// Live connections from `from` (may be blank) to `to`.
    ///
    /// An empty result is reported as an error.
    async fn search_transport(&self, from: &str, to: &str) -> Result<Vec<TransportOption>>;
}

#[derive(Debug, Deserialize)]
struct ConnectionsResponse {
    #[serde(default)]
    connections: Vec<Connection>,
}

#[derive(Debug, Deserialize)]
struct Connection {
    #[serde(default)]
    duration: Option<String>,
    #[serde(default)]
    products: Vec<Option<String>>,
    #[serde(default)]
    transfers: Option<i64>,
}

/// Client for the `/connections` endpoint of a transport.opendata.ch style API
#[derive(Debug, Clone)]
pub struct OpenTransportProvider {
    enabled: bool,
    base_url: String,
    client: ClientWithMiddleware,
}

impl OpenTransportProvider {
    pub fn new(config: &TransportConfig) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(concat!("exchange-planner/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PlannerError::provider(format!("Failed to create HTTP client: {e}")))?;

        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let client = ClientBuilder::new(inner)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            enabled: config.enabled,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn connections_url(&self, from: &str, to: &str) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/connections", self.base_url))
            .map_err(|e| PlannerError::provider(format!("Invalid provider URL: {e}")))?;
        {
            let mut query = url.query_pairs_mut();
            if !from.trim().is_empty() {
                query.append_pair("from", from);
            }
            query.append_pair("limit", CONNECTION_LIMIT);
            query.append_pair("to", to);
        }
        Ok(url)
    }
}

#[async_trait]
impl TransportProvider for OpenTransportProvider {
    #[tracing::instrument(skip(self))]
    async fn search_transport(&self, from: &str, to: &str) -> Result<Vec<TransportOption>> {
        if !self.enabled {
            return Err(PlannerError::provider("provider disabled"));
        }

        let url = self.connections_url(from, to)?;
        info!("Querying transport provider: {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| PlannerError::provider(format!("Provider request failed: {e}")))?;

        if !response.status().is_success() {
            warn!("Transport provider returned status {}", response.status());
            return Err(PlannerError::provider(format!(
                "Provider returned status {}",
                response.status().as_u16()
            )));
        }

        let payload: ConnectionsResponse = response
            .json()
            .await
            .map_err(|e| {
                PlannerError::provider(format!("Failed to decode provider response: {e}"))
            })?;

        let options: Vec<TransportOption> = payload
            .connections
            .iter()
            .filter_map(|connection| {
                let hours = connection.duration.as_deref().and_then(parse_duration_hours);
                let Some(hours) = hours else {
                    debug!("Skipping connection with duration {:?}", connection.duration);
                    return None;
                };
                let transfers = connection.transfers.unwrap_or(0) as f64;
                Some(TransportOption {
                    provider: PROVIDER_NAME.to_string(),
                    mode: infer_mode(&connection.products),
                    duration_hours: round_to(hours, 1),
                    price: round_to(18.0 + hours * 16.0 + transfers * 5.0, 2),
                    deeplink: url.to_string(),
                })
            })
            .collect();

        if options.is_empty() {
            return Err(PlannerError::provider("Provider returned no transport options"));
        }
        Ok(options)
    }
}

/// `bus` when any product names a bus line, otherwise `train`
pub fn infer_mode(products: &[Option<String>]) -> TransportMode {
    let is_bus = products
        .iter()
        .flatten()
        .any(|product| product.trim().to_uppercase().contains("BUS"));
    if is_bus {
        TransportMode::Bus
    } else {
        TransportMode::Train
    }
}

/// Parse `HH:MM[:SS]` or `Nd HH:MM[:SS]` into fractional hours. Seconds are ignored.
pub fn parse_duration_hours(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let parts: Vec<&str> = raw.split('d').collect();
    match parts.as_slice() {
        [days, clock] => {
            let days: i64 = days.parse().ok()?;
            Some(days.checked_mul(24)? as f64 + parse_clock(clock)?)
        }
        _ => parse_clock(raw),
    }
}

fn parse_clock(raw: &str) -> Option<f64> {
    let mut fields = raw.split(':');
    let hours: i64 = fields.next()?.parse().ok()?;
    let minutes: i64 = fields.next()?.parse().ok()?;
    Some(hours as f64 + minutes as f64 / 60.0)
}
