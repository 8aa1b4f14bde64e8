use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    routing::{get, post},
    Router,
};

pub mod config;
pub mod db;
pub mod errors;
pub mod routes;
pub mod state;

pub use config::Config;
pub use errors::AppError;
pub use state::{AppState, EngineState};

pub fn now_unix() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs()
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(routes::healthz))
        .route("/readyz", get(routes::readyz))
        .route("/version", get(routes::version))
        .route("/find_path", post(routes::find_path))
        .route("/optimize", post(routes::optimize))
        .route("/route", post(routes::route))
        .route("/route/build", post(routes::build_route))
        .route("/bearing", post(routes::bearing))
        .route("/transform/to_world", post(routes::to_world))
        .route("/transform/to_map", post(routes::to_map))
        .route("/beacons", get(routes::list_beacons).post(routes::add_beacon))
        .route("/beacons/nearest", get(routes::nearest_beacon))
        .route("/beacons/:id", get(routes::get_beacon).delete(routes::delete_beacon))
        .route("/signal/nearby", get(routes::signal_nearby))
        .route("/admin/reload", post(routes::reload))
        .with_state(state)
}
