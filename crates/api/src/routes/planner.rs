//! Campaign Planner Routes

use axum::{extract::rejection::JsonRejection, Json};
use planner::{build_audience, calculate_budget, AudienceProfile, AudienceRequest, BudgetPlan, BudgetRequest};

use crate::error::ApiError;

/// POST /api/planner/budget
pub async fn budget(
    body: Result<Json<BudgetRequest>, JsonRejection>,
) -> Result<Json<BudgetPlan>, ApiError> {
    let Json(request) = body?;
    Ok(Json(calculate_budget(&request)?))
}

/// POST /api/planner/audience
pub async fn audience(
    body: Result<Json<AudienceRequest>, JsonRejection>,
) -> Result<Json<AudienceProfile>, ApiError> {
    let Json(request) = body?;
    Ok(Json(build_audience(&request)))
}
