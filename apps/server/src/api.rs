use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use powerwatch_core::{Snapshot, TriggerOutcome};

use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::main_lib::AppState;
use crate::models::{
    RefreshResponse, ScanIntervalUpdate, StatusResponse, YearlyEntitiesResponse, YearlyEntityView,
};

pub async fn healthz() -> &'static str {
    "ok"
}

async fn get_snapshot(State(state): State<Arc<AppState>>) -> ApiResult<Json<Arc<Snapshot>>> {
    state
        .scheduler
        .latest()
        .map(Json)
        .ok_or_else(|| ApiError::Unavailable("No snapshot has been published yet".to_string()))
}

async fn refresh(
    State(state): State<Arc<AppState>>,
) -> ApiResult<(StatusCode, Json<RefreshResponse>)> {
    match state.scheduler.trigger().await? {
        TriggerOutcome::Completed { status, snapshot } => Ok((
            StatusCode::ACCEPTED,
            Json(RefreshResponse {
                status,
                using_cache: snapshot.is_using_cache(),
                last_updated: snapshot.last_updated(),
            }),
        )),
        TriggerOutcome::Skipped => Err(ApiError::Conflict(
            "A poll cycle is already in flight".to_string(),
        )),
    }
}

async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        state: state.scheduler.state(),
        scan_interval_minutes: state.scheduler.config().interval_minutes(),
        last_cycle: state.scheduler.last_report(),
    })
}

async fn update_scan_interval(
    State(state): State<Arc<AppState>>,
    Json(update): Json<ScanIntervalUpdate>,
) -> ApiResult<Json<StatusResponse>> {
    state.scheduler.set_interval(update.minutes)?;
    Ok(get_status(State(state)).await)
}

fn yearly_view(state: &AppState, year: i32) -> YearlyEntitiesResponse {
    let snapshot = state.scheduler.latest();
    YearlyEntitiesResponse {
        year,
        entities: state
            .yearly_registry
            .entities(year)
            .iter()
            .map(|entity| YearlyEntityView::new(entity, snapshot.as_deref()))
            .collect(),
    }
}

async fn list_yearly_entities(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<YearlyEntitiesResponse>> {
    let years = state.yearly_registry.years();
    Json(
        years
            .into_iter()
            .map(|year| yearly_view(&state, year))
            .collect(),
    )
}

async fn get_yearly_entities(
    State(state): State<Arc<AppState>>,
    Path(year): Path<i32>,
) -> ApiResult<Json<YearlyEntitiesResponse>> {
    if !state.yearly_registry.years().contains(&year) {
        return Err(ApiError::NotFound);
    }
    Ok(Json(yearly_view(&state, year)))
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let cors = if config.cors_allow.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins = config
            .cors_allow
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect::<Vec<_>>();
        CorsLayer::new().allow_origin(origins)
    };

    let api = Router::new()
        .route("/healthz", get(healthz))
        .route("/snapshot", get(get_snapshot))
        .route("/refresh", post(refresh))
        .route("/status", get(get_status))
        .route("/settings/scan-interval", put(update_scan_interval))
        .route("/entities/yearly", get(list_yearly_entities))
        .route("/entities/yearly/{year}", get(get_yearly_entities))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api)
        .layer(cors)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::new(config.http_timeout))
        .layer(TraceLayer::new_for_http())
}
