use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;

use estate_core::reports::{self, DateRange, FinancialSummary};
use estate_core::store::ReportStore;

use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// GET /api/reports/financial?startDate=<date>&endDate=<date>
///
/// Bounds default to January 1 of the current year and now. The clock is
/// read here, at the edge; range resolution itself is pure.
pub async fn financial_summary<S: ReportStore + Clone>(
    State(app): State<AppState<S>>,
    Query(params): Query<FinancialParams>,
) -> Result<Json<FinancialSummary>, AppError> {
    let range = DateRange::resolve(
        params.start_date.as_deref(),
        params.end_date.as_deref(),
        Utc::now(),
    )?;
    Ok(Json(reports::financial_summary(&app.store, range).await?))
}
