//! Engine status handler

use axum::{extract::State, Json};
use std::sync::Arc;
use vibemail_core::EngineStatus;

use crate::state::AppState;

/// Simulation worker status
#[utoipa::path(
    get,
    path = "/api/v1/engine",
    tag = "engine",
    responses((status = 200, description = "Worker configuration, tick count and last tick report"))
)]
pub async fn get_engine_status(State(state): State<Arc<AppState>>) -> Json<EngineStatus> {
    let campaigns = state.workspace.campaigns().get_all().await;

    Json(EngineStatus {
        enabled: state.engine_config.enabled,
        active: campaigns.iter().any(|c| c.is_running()),
        tick_interval_secs: state.engine_config.tick_interval_secs,
        ticks: state.engine.ticks(),
        last_tick: state.engine.last_report().await,
    })
}
