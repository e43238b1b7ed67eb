use axum::extract::State;
use axum::Json;

use estate_core::records::PropertyDetails;
use estate_core::reports::{self, PropertyStats};
use estate_core::store::ReportStore;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/reports/properties/stats
pub async fn property_stats<S: ReportStore + Clone>(
    State(app): State<AppState<S>>,
) -> Result<Json<PropertyStats>, AppError> {
    Ok(Json(reports::property_stats(&app.store).await?))
}

/// GET /api/reports/properties
pub async fn list_properties<S: ReportStore + Clone>(
    State(app): State<AppState<S>>,
) -> Result<Json<Vec<PropertyDetails>>, AppError> {
    Ok(Json(reports::list_properties(&app.store).await?))
}
