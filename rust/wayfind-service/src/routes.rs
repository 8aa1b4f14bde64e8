use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, info_span, warn};

use wayfind_core::beacons::signal::{self, Detection, DEFAULT_SCAN_RANGE};
use wayfind_core::{
    direction_to, Beacon, Bearing, Destination, NewBeacon, PathResult, Point2D, Point3D, TripPlan,
};

use crate::errors::AppError;
use crate::state::{AppState, EngineState};

#[derive(Debug, Serialize)]
pub struct Healthz {
    pub status: &'static str,
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(Healthz { status: "ok" }))
}

pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    let engine = state.engine();
    match state.beacons.list() {
        Ok(beacons) => (
            StatusCode::OK,
            Json(json!({
                "ready": true,
                "waypoints": engine.wayfinder.graph().len(),
                "beacons": beacons.len(),
                "loaded_at_unix": engine.loaded_at_unix,
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "readyz failed");
            (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"ready": false, "error": e.to_string()}))).into_response()
        }
    }
}

pub async fn version() -> impl IntoResponse {
    let svc_version = env!("CARGO_PKG_VERSION");
    let core_version = wayfind_core::version();
    (StatusCode::OK, Json(json!({"service_version": svc_version, "core_version": core_version})))
}

#[derive(Debug, Deserialize)]
pub struct FindPathRequest {
    pub start: Point2D,
    pub end: Point2D,
}

pub async fn find_path(
    State(state): State<AppState>,
    Json(req): Json<FindPathRequest>,
) -> Result<Json<PathResult>, AppError> {
    let span = info_span!("find_path", start_x = req.start.x, start_y = req.start.y, end_x = req.end.x, end_y = req.end.y);
    let _enter = span.enter();

    let res = state.engine().search_cached(req.start, req.end)?;
    info!(status = ?res.status, expanded = res.expanded, path_len = res.path.len(), "find_path done");
    Ok(Json(PathResult::clone(&res)))
}

#[derive(Debug, Deserialize)]
pub struct OptimizeRequest {
    pub destinations: Vec<Destination>,
    /// Entrance of the configured transform when omitted.
    pub start: Option<Point2D>,
}

fn start_or_entrance(engine: &EngineState, start: Option<Point2D>) -> Point2D {
    start.unwrap_or_else(|| engine.wayfinder.transform().entrance())
}

pub async fn optimize(
    State(state): State<AppState>,
    Json(req): Json<OptimizeRequest>,
) -> Result<Json<Vec<Destination>>, AppError> {
    let engine = state.engine();
    let start = start_or_entrance(&engine, req.start);
    let ordered = engine.wayfinder.optimize_stops(&req.destinations, start)?;
    info!(requested = req.destinations.len(), ordered = ordered.len(), "optimize done");
    Ok(Json(ordered))
}

#[derive(Debug, Deserialize)]
pub struct RouteRequest {
    pub destinations: Vec<Destination>,
    pub start: Option<Point2D>,
}

pub async fn route(State(state): State<AppState>, Json(req): Json<RouteRequest>) -> Result<Json<TripPlan>, AppError> {
    let span = info_span!("route", destinations = req.destinations.len());
    let _enter = span.enter();

    let engine = state.engine();
    let start = start_or_entrance(&engine, req.start);
    let plan = engine.wayfinder.plan_trip(&req.destinations, start)?;
    Ok(Json(plan))
}

/// Route through explicit stops in the given order, no reordering.
#[derive(Debug, Deserialize)]
pub struct BuildRouteRequest {
    pub start: Point2D,
    #[serde(default)]
    pub staging: Option<Point2D>,
    pub stops: Vec<Destination>,
    pub checkout: Point2D,
    pub exit: Point2D,
}

pub async fn build_route(
    State(state): State<AppState>,
    Json(req): Json<BuildRouteRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let engine = state.engine();
    let path = engine.wayfinder.build_full_route(req.start, req.staging, &req.stops, req.checkout, req.exit)?;
    Ok(Json(json!({ "path": path, "length": wayfind_core::path_length(&path) })))
}

#[derive(Debug, Deserialize)]
pub struct BearingRequest {
    pub observer: Point3D,
    pub forward: Point3D,
    #[serde(default)]
    pub target: Option<Point3D>,
    #[serde(default)]
    pub beacon_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BearingResponse {
    #[serde(flatten)]
    pub bearing: Bearing,
    pub arrived: bool,
    pub direction: Point3D,
}

pub async fn bearing(
    State(state): State<AppState>,
    Json(req): Json<BearingRequest>,
) -> Result<Json<BearingResponse>, AppError> {
    let engine = state.engine();
    let wf = &engine.wayfinder;
    let (bearing, target) = match (req.target, req.beacon_id.as_deref()) {
        (Some(target), None) => (wf.bearing_and_distance(req.observer, req.forward, target)?, target),
        (None, Some(id)) => {
            let target = state
                .beacons
                .get(id)?
                .ok_or_else(|| AppError::NotFound(format!("beacon {id}")))?
                .world_position;
            (wf.bearing_and_distance(req.observer, req.forward, target)?, target)
        }
        _ => return Err(AppError::BadRequest("exactly one of target or beacon_id is required".into())),
    };
    Ok(Json(BearingResponse { arrived: bearing.arrived(), direction: direction_to(req.observer, target), bearing }))
}

#[derive(Debug, Deserialize)]
pub struct ToWorldRequest {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub height: Option<f64>,
}

pub async fn to_world(State(state): State<AppState>, Json(req): Json<ToWorldRequest>) -> Result<Json<Point3D>, AppError> {
    let engine = state.engine();
    let p = Point2D::new(req.x, req.y);
    let mut w = engine.wayfinder.map_to_world(p)?;
    if let Some(h) = req.height {
        if !h.is_finite() {
            return Err(AppError::BadRequest("height must be finite".into()));
        }
        w = engine.wayfinder.transform().map_to_world_at(p, h);
    }
    Ok(Json(w))
}

pub async fn to_map(State(state): State<AppState>, Json(req): Json<Point3D>) -> Result<Json<Point2D>, AppError> {
    Ok(Json(state.engine().wayfinder.world_to_map(req)?))
}

pub async fn list_beacons(State(state): State<AppState>) -> Result<Json<Vec<Beacon>>, AppError> {
    Ok(Json(state.beacons.list()?))
}

pub async fn add_beacon(
    State(state): State<AppState>,
    Json(req): Json<NewBeacon>,
) -> Result<(StatusCode, Json<Beacon>), AppError> {
    let stored = state.beacons.add(req)?;
    Ok((StatusCode::CREATED, Json(stored)))
}

pub async fn get_beacon(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Beacon>, AppError> {
    state
        .beacons
        .get(&id)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("beacon {id}")))
}

pub async fn delete_beacon(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode, AppError> {
    if state.beacons.remove(&id)? {
        info!(%id, "beacon removed");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("beacon {id}")))
    }
}

#[derive(Debug, Deserialize)]
pub struct NearestQuery {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

pub async fn nearest_beacon(
    State(state): State<AppState>,
    Query(q): Query<NearestQuery>,
) -> Result<Json<Beacon>, AppError> {
    let at = Point3D::new(q.x, q.y, q.z);
    if !at.is_finite() {
        return Err(AppError::BadRequest("position must be finite".into()));
    }
    state.beacons.nearest(at)?.map(Json).ok_or_else(|| AppError::NotFound("no beacons placed".into()))
}

#[derive(Debug, Deserialize)]
pub struct SignalQuery {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub range: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct SignalResponse {
    pub detections: Vec<Detection>,
    pub estimated_position: Option<Point2D>,
}

pub async fn signal_nearby(Query(q): Query<SignalQuery>) -> Result<Json<SignalResponse>, AppError> {
    let at = Point2D::new(q.x, q.y);
    let range = q.range.unwrap_or(DEFAULT_SCAN_RANGE);
    if !at.is_finite() || !range.is_finite() || range < 0.0 {
        return Err(AppError::BadRequest("position and range must be finite, range non-negative".into()));
    }
    let detections = signal::nearby(&signal::store(), at, range);
    let estimated_position = signal::estimate_position(&detections);
    Ok(Json(SignalResponse { detections, estimated_position }))
}

/// Re-read the layout file and swap in a fresh engine with an empty path cache.
pub async fn reload(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let current = state.engine();
    let capacity = current.cache_capacity();
    let next = match EngineState::load(current.layout_path.as_deref(), (*state.options).clone(), capacity) {
        Ok(next) => next,
        Err(e) => {
            warn!(error = %e, "reload failed, keeping current layout");
            return Err(AppError::Internal(e));
        }
    };
    let waypoints = next.wayfinder.graph().len();
    let loaded_at_unix = next.loaded_at_unix;
    state.current.store(Arc::new(next));
    info!(waypoints, "layout reloaded");
    Ok(Json(json!({ "reloaded": true, "waypoints": waypoints, "loaded_at_unix": loaded_at_unix })))
}
