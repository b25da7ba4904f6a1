use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::assemble::BuildAssembler;
use crate::models::{AssembleRequest, Build, BuildState};
use crate::state::AppState;

/// POST /api/assemble - Full assembly pipeline:
///   1. Planning: budget → per-category price bands
///   2. Searching: concurrent candidate search, one task per category
///   3. Validating: compatibility rules over the top-ranked picks
///
/// An incomplete build is still a 200: the caller gets the partial parts
/// list plus the report rather than an error.
pub async fn assemble(
    State(state): State<AppState>,
    Json(req): Json<AssembleRequest>,
) -> Result<Json<Build>, (StatusCode, String)> {
    let archetype = req.archetype.parse().map_err(super::error_response)?;

    let assembler = BuildAssembler::new(
        state.searcher.clone(),
        state.config.budget.clone(),
        &state.config.search,
    );

    let build = assembler
        .assemble(archetype, req.budget, &req.hint)
        .await
        .map_err(super::error_response)?;

    if build.state == BuildState::Incomplete {
        tracing::info!(
            "Assembly for '{archetype}' incomplete: {} unfilled, {} rule failures",
            build.unfilled.len(),
            build.report.failures().count()
        );
    }

    Ok(Json(build))
}
