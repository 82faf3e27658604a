//! On-demand dashboard endpoint (§4.4 "Dashboard").

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use common::SystemStatus;
use health::MonitoringDashboard;

pub async fn dashboard(State(state): State<AppState>) -> (StatusCode, Json<MonitoringDashboard>) {
    let dashboard = state.health_controller.dashboard().await;
    let status_code = match dashboard.status {
        SystemStatus::Healthy | SystemStatus::Degraded => StatusCode::OK,
        SystemStatus::Critical | SystemStatus::Emergency | SystemStatus::Offline => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status_code, Json(dashboard))
}
