use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::controls::ControlStatus;
use super::domain::{EvaluationResult, Rating};
use super::RiskRatingEvaluator;

#[derive(Debug, Clone, Deserialize)]
pub struct EvaluateRequest {
    pub notes: String,
    #[serde(default)]
    pub include_controls: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateResponse {
    #[serde(flatten)]
    pub result: EvaluationResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controls: Option<Vec<ControlStatus>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TiersResponse {
    pub tiers: Vec<Rating>,
    pub fallback: Rating,
}

/// Router builder exposing the rating endpoints.
pub fn rating_router(evaluator: Arc<RiskRatingEvaluator>) -> Router {
    Router::new()
        .route("/api/v1/ratings/evaluate", post(evaluate_handler))
        .route("/api/v1/ratings/tiers", get(tiers_handler))
        .with_state(evaluator)
}

pub(crate) async fn evaluate_handler(
    State(evaluator): State<Arc<RiskRatingEvaluator>>,
    Json(request): Json<EvaluateRequest>,
) -> Json<EvaluateResponse> {
    let trace = evaluator.trace(&request.notes);
    let controls = request.include_controls.then_some(trace.controls);

    Json(EvaluateResponse {
        result: trace.result,
        controls,
    })
}

pub(crate) async fn tiers_handler() -> Json<TiersResponse> {
    Json(TiersResponse {
        tiers: Rating::tiers().to_vec(),
        fallback: Rating::VeryUnfavorable,
    })
}
