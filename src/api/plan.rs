use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::budget;
use crate::compat;
use crate::models::{BudgetPlan, CompatRequest, CompatResponse, PlanRequest};
use crate::state::AppState;

/// POST /api/plan - Compute per-category price bands for an archetype.
pub async fn plan(
    State(state): State<AppState>,
    Json(req): Json<PlanRequest>,
) -> Result<Json<BudgetPlan>, (StatusCode, String)> {
    let archetype = req.archetype.parse().map_err(super::error_response)?;
    let plan = budget::allocate(&state.config.budget, archetype, req.budget)
        .map_err(super::error_response)?;
    Ok(Json(plan))
}

/// POST /api/compat - Run every compatibility rule over a candidate set.
/// A failed rule is a report entry, never an HTTP error.
pub async fn check_compat(Json(req): Json<CompatRequest>) -> Json<CompatResponse> {
    let report = compat::check(&req.candidates);
    Json(CompatResponse {
        valid: report.is_valid(),
        report,
    })
}
