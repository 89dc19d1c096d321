//! Axum route handlers for the report API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::extract::JsonBody;
use crate::models::report::{AnalysisReport, DepartmentList};
use crate::models::survey::SurveyInput;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DepartmentRequest {
    pub industry: String,
}

/// POST /generate-departments
///
/// Suggests 5-8 automatable departments for an industry.
pub async fn handle_generate_departments(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<DepartmentRequest>,
) -> Result<Json<DepartmentList>, AppError> {
    if request.industry.trim().is_empty() {
        return Err(AppError::Validation("industry cannot be empty".to_string()));
    }

    let list = state.reports.generate_departments(&request.industry).await?;
    Ok(Json(list))
}

/// POST /calculate-roi
///
/// Full pipeline: survey → prompt → LLM → validated report. Nothing is persisted.
pub async fn handle_calculate_roi(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<SurveyInput>,
) -> Result<Json<AnalysisReport>, AppError> {
    input.check_required().map_err(AppError::Validation)?;

    let report = state.reports.calculate_roi(&input).await?;
    Ok(Json(report))
}
