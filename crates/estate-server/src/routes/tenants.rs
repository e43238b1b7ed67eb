use axum::extract::State;
use axum::Json;

use estate_core::reports::{self, TenantStats};
use estate_core::store::ReportStore;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/reports/tenants/stats
pub async fn tenant_stats<S: ReportStore + Clone>(
    State(app): State<AppState<S>>,
) -> Result<Json<TenantStats>, AppError> {
    Ok(Json(reports::tenant_stats(&app.store).await?))
}
