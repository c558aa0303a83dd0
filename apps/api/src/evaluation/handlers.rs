use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::evaluation::engine::run_evaluation;
use crate::evaluation::models::EvaluationResult;
use crate::evaluation::progress::TracingProgress;
use crate::state::AppState;

#[derive(Serialize)]
pub struct EvaluateResponse {
    pub evaluation_id: Uuid,
    pub evaluated_at: DateTime<Utc>,
    pub model: String,
    pub result: EvaluationResult,
    pub cost_usd: f64,
}

/// POST /api/v1/evaluate
///
/// Body is taken as raw JSON so that a missing or non-string `resumeText` is
/// reported as a validation error rather than an extractor rejection.
pub async fn handle_evaluate(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<EvaluateResponse>, AppError> {
    let resume_text = extract_resume_text(body)?;

    let evaluation_id = Uuid::new_v4();

    let result = run_evaluation(state.llm.as_ref(), &state.settings, &resume_text, &TracingProgress)
        .instrument(info_span!("evaluation", %evaluation_id))
        .await?;

    let cost_usd = state.settings.pricing.cost_usd(&result.usage);

    Ok(Json(EvaluateResponse {
        evaluation_id,
        evaluated_at: Utc::now(),
        model: state.llm.model().to_string(),
        result,
        cost_usd,
    }))
}

fn extract_resume_text(body: Result<Json<Value>, JsonRejection>) -> Result<String, AppError> {
    let invalid = || AppError::Validation("Invalid or missing resumeText.".to_string());

    let Json(body) = body.map_err(|rejection| {
        tracing::debug!("Rejected evaluate body: {rejection}");
        invalid()
    })?;

    match body.get("resumeText") {
        Some(Value::String(text)) if !text.trim().is_empty() => Ok(text.clone()),
        _ => Err(invalid()),
    }
}
