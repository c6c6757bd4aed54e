//! JSON handlers for the `/api` routes

use std::sync::Arc;

use axum::{
    Extension, Router,
    body::Bytes,
    extract::{FromRequest, Path, Query, Request, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::json;
use tracing::{debug, error};

use crate::auth::{AuthSettings, AuthUser, require_auth};
use crate::models::{
    AcademicEvent, BudgetEntry, ConflictAlert, ForecastResult, StayOption, TransportOption,
    TravelWindow, Trip, TripConstraint, TripOption,
};
use crate::planner::Planner;
use crate::PlannerError;

type ApiResult<T> = Result<T, PlannerError>;

#[derive(Clone)]
pub struct AppState {
    pub planner: Arc<Planner>,
}

impl IntoResponse for PlannerError {
    fn into_response(self) -> Response {
        let status = match &self {
            PlannerError::Validation { .. } => StatusCode::BAD_REQUEST,
            PlannerError::NotFound { .. } => StatusCode::NOT_FOUND,
            PlannerError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }
        (status, Json(json!({ "error": self.user_message() }))).into_response()
    }
}

/// JSON body that answers 400 `invalid json` when it cannot be decoded.
///
/// The content type is not checked.
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;
        serde_json::from_slice(&body).map(ApiJson).map_err(|e| {
            debug!("Rejecting request body: {}", e);
            PlannerError::validation("invalid json").into_response()
        })
    }
}

/// Protected API routes; every request passes through [`require_auth`]
pub fn router(state: AppState, auth: Arc<AuthSettings>) -> Router {
    Router::new()
        .route("/calendar/import", post(import_calendar))
        .route("/travel-windows", get(list_travel_windows))
        .route("/trips/optimize", post(optimize_trips))
        .route("/trips/{id}", get(get_trip))
        .route("/trips/{id}/share", post(share_trip))
        .route("/budget/entries", get(list_budget_entries).post(add_budget_entry))
        .route("/budget/forecast", get(budget_forecast))
        .route("/search/transport", get(search_transport))
        .route("/search/stays", get(search_stays))
        .route("/conflicts/evaluate", post(evaluate_conflicts))
        .layer(middleware::from_fn_with_state(auth, require_auth))
        .with_state(state)
}

/// Treat `?key=` the same as an absent key
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

#[derive(Deserialize)]
struct ImportRequest {
    #[serde(default)]
    events: Vec<AcademicEvent>,
}

#[derive(Serialize)]
struct EventsResponse {
    events: Vec<AcademicEvent>,
}

async fn import_calendar(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ImportRequest>,
) -> ApiResult<Json<EventsResponse>> {
    let events = state.planner.import_events(request.events).await?;
    Ok(Json(EventsResponse { events }))
}

#[derive(Deserialize)]
struct WindowQuery {
    from: Option<String>,
    to: Option<String>,
}

#[derive(Serialize)]
struct WindowsResponse {
    windows: Vec<TravelWindow>,
}

async fn list_travel_windows(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> ApiResult<Json<WindowsResponse>> {
    let windows = state
        .planner
        .travel_windows(present(&query.from), present(&query.to))
        .await?;
    Ok(Json(WindowsResponse { windows }))
}

#[derive(Serialize)]
struct TripOptionsResponse {
    options: Vec<TripOption>,
}

async fn optimize_trips(
    State(state): State<AppState>,
    ApiJson(constraint): ApiJson<TripConstraint>,
) -> ApiResult<Json<TripOptionsResponse>> {
    let options = state.planner.optimize_trips(&constraint).await?;
    Ok(Json(TripOptionsResponse { options }))
}

async fn get_trip(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Trip>> {
    Ok(Json(state.planner.trip(&id).await?))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShareRequest {
    #[serde(default)]
    member_ids: Vec<String>,
}

async fn share_trip(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<ShareRequest>,
) -> ApiResult<Json<Trip>> {
    Ok(Json(state.planner.share_trip(&id, request.member_ids).await?))
}

#[derive(Serialize)]
struct EntriesResponse {
    entries: Vec<BudgetEntry>,
}

async fn list_budget_entries(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> ApiResult<Json<EntriesResponse>> {
    let entries = state.planner.budget_entries(&user_id).await?;
    Ok(Json(EntriesResponse { entries }))
}

async fn add_budget_entry(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    ApiJson(entry): ApiJson<BudgetEntry>,
) -> ApiResult<(StatusCode, Json<BudgetEntry>)> {
    let entry = state.planner.add_budget_entry(&user_id, entry).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ForecastQuery {
    trip_id: Option<String>,
}

async fn budget_forecast(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Query(query): Query<ForecastQuery>,
) -> ApiResult<Json<ForecastResult>> {
    let forecast = state
        .planner
        .forecast(&user_id, present(&query.trip_id))
        .await?;
    Ok(Json(forecast))
}

#[derive(Deserialize)]
struct TransportQuery {
    from: Option<String>,
    to: Option<String>,
}

#[derive(Serialize)]
struct TransportResponse {
    options: Vec<TransportOption>,
}

async fn search_transport(
    State(state): State<AppState>,
    Query(query): Query<TransportQuery>,
) -> ApiResult<Json<TransportResponse>> {
    let to = present(&query.to).ok_or_else(|| PlannerError::validation("missing to"))?;
    let from = query.from.as_deref().unwrap_or_default();
    let options = state.planner.search_transport(from, to).await?;
    Ok(Json(TransportResponse { options }))
}

#[derive(Deserialize)]
struct StaysQuery {
    city: Option<String>,
}

#[derive(Serialize)]
struct StaysResponse {
    options: Vec<StayOption>,
}

async fn search_stays(
    State(state): State<AppState>,
    Query(query): Query<StaysQuery>,
) -> ApiResult<Json<StaysResponse>> {
    let city = present(&query.city).ok_or_else(|| PlannerError::validation("missing city"))?;
    let options = state.planner.search_stays(city).await?;
    Ok(Json(StaysResponse { options }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConflictRequest {
    #[serde(default)]
    window_id: String,
}

#[derive(Serialize)]
struct AlertsResponse {
    alerts: Vec<ConflictAlert>,
}

async fn evaluate_conflicts(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ConflictRequest>,
) -> ApiResult<Json<AlertsResponse>> {
    if request.window_id.is_empty() {
        return Err(PlannerError::validation("missing windowId"));
    }
    let alerts = state.planner.evaluate_conflicts(&request.window_id).await?;
    Ok(Json(AlertsResponse { alerts }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_error_status_mapping() {
        let cases = [
            (
                PlannerError::validation("missing city"),
                StatusCode::BAD_REQUEST,
                "missing city",
            ),
            (
                PlannerError::not_found("trip not found"),
                StatusCode::NOT_FOUND,
                "trip not found",
            ),
            (
                PlannerError::unauthorized("bad token"),
                StatusCode::UNAUTHORIZED,
                "unauthorized",
            ),
            (
                PlannerError::storage("lock poisoned"),
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal error",
            ),
        ];
        for (err, status, message) in cases {
            let response = err.into_response();
            assert_eq!(response.status(), status);
            assert_eq!(body_json(response).await, json!({ "error": message }));
        }
    }

    #[test]
    fn test_present_ignores_blank() {
        assert_eq!(present(&Some(String::new())), None);
        assert_eq!(present(&None), None);
        assert_eq!(present(&Some("Prague".to_string())), Some("Prague"));
    }
}
