//! Budget ledger entries and affordability forecasts

use serde::{Deserialize, Serialize};

pub const DEFAULT_CURRENCY: &str = "EUR";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BudgetEntry {
    pub id: String,
    pub user_id: String,
    pub category: String,
    pub amount: f64,
    pub currency: String,
    /// Booking date (`YYYY-MM-DD`)
    pub date: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub trip_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub note: String,
}

impl BudgetEntry {
    /// Whether the entry carries everything the ledger needs
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.category.is_empty() && self.amount > 0.0 && !self.date.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Affordability {
    Green,
    Amber,
    Red,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResult {
    pub projected_monthly_spend: f64,
    pub remaining_budget: f64,
    pub affordability: Affordability,
}
