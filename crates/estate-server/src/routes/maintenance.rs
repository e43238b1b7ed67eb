use axum::extract::State;
use axum::Json;

use estate_core::reports::{self, MaintenanceSummary};
use estate_core::store::ReportStore;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/reports/maintenance
pub async fn maintenance_summary<S: ReportStore + Clone>(
    State(app): State<AppState<S>>,
) -> Result<Json<MaintenanceSummary>, AppError> {
    Ok(Json(reports::maintenance_summary(&app.store).await?))
}
