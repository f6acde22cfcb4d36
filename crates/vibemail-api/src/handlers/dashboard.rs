//! Dashboard handler

use axum::{extract::State, Json};
use std::sync::Arc;
use vibemail_core::DashboardStats;

use crate::state::AppState;

/// Aggregate outreach metrics
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    tag = "dashboard",
    responses((status = 200, description = "Totals, rates and running campaign progress"))
)]
pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardStats> {
    let campaigns = state.workspace.campaigns().get_all().await;
    Json(DashboardStats::from_campaigns(&campaigns.items))
}
