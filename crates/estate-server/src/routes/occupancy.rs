use axum::extract::State;
use axum::Json;

use estate_core::reports::{self, OccupancySummary};
use estate_core::store::ReportStore;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/reports/occupancy
pub async fn occupancy_summary<S: ReportStore + Clone>(
    State(app): State<AppState<S>>,
) -> Result<Json<OccupancySummary>, AppError> {
    Ok(Json(reports::occupancy_summary(&app.store).await?))
}
