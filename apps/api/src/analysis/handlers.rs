//! Axum route handlers for the analysis API.
//!
//! Every handler answers 200 with a schema-valid body. How the body was
//! obtained is reported in the `x-recovery-provenance` header.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};

use crate::analysis::models::{
    ConflictAnalysisRequest, ConstraintAnalysisRequest, ParameterOptimizationRequest,
    ScheduleExplanationRequest,
};
use crate::analysis::service::analyze;
use crate::errors::AppJson;
use crate::recovery::RecoveredResult;
use crate::state::AppState;

pub const PROVENANCE_HEADER: &str = "x-recovery-provenance";

impl IntoResponse for RecoveredResult {
    fn into_response(self) -> Response {
        (
            [(PROVENANCE_HEADER, self.provenance.label())],
            Json(self.value),
        )
            .into_response()
    }
}

/// POST /api/llm/analyze-constraints
///
/// Extracts explicit and implicit scheduling constraints from free text.
pub async fn handle_analyze_constraints(
    State(state): State<AppState>,
    AppJson(request): AppJson<ConstraintAnalysisRequest>,
) -> RecoveredResult {
    analyze(state.llm.as_ref(), &request).await
}

/// POST /api/llm/analyze-conflicts
pub async fn handle_analyze_conflicts(
    State(state): State<AppState>,
    AppJson(request): AppJson<ConflictAnalysisRequest>,
) -> RecoveredResult {
    analyze(state.llm.as_ref(), &request).await
}

/// POST /api/llm/explain-schedule
///
/// Explains why a course landed in its time slot, room and teacher.
pub async fn handle_explain_schedule(
    State(state): State<AppState>,
    AppJson(request): AppJson<ScheduleExplanationRequest>,
) -> RecoveredResult {
    analyze(state.llm.as_ref(), &request).await
}

/// POST /api/llm/optimize-parameters
pub async fn handle_optimize_parameters(
    State(state): State<AppState>,
    AppJson(request): AppJson<ParameterOptimizationRequest>,
) -> RecoveredResult {
    analyze(state.llm.as_ref(), &request).await
}
