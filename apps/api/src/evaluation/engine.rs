//! Evaluation Engine — one resume in, one `EvaluationResult` out.
//!
//! Flow: coordinator (5 concurrent groups) → scoring → overview → usage total.
//! Any fatal error ends the evaluation without a partial result.

use tracing::{debug, info};

use crate::config::Config;
use crate::errors::AppError;
use crate::evaluation::coordinator::evaluate_all_groups;
use crate::evaluation::cost::Pricing;
use crate::evaluation::group_evaluator::RetryPolicy;
use crate::evaluation::models::{EvaluationResult, EvaluationSummary};
use crate::evaluation::overview::synthesize_overview;
use crate::evaluation::progress::{EvaluationProgress, ProgressEvent};
use crate::evaluation::scoring::score_verdicts;
use crate::llm_client::ReasoningService;

/// Per-process evaluation knobs, built once from `Config`.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationSettings {
    pub retry: RetryPolicy,
    pub pricing: Pricing,
}

impl EvaluationSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            retry: RetryPolicy::from_config(config),
            pricing: Pricing::from_config(config),
        }
    }
}

pub async fn run_evaluation(
    llm: &dyn ReasoningService,
    settings: &EvaluationSettings,
    resume_text: &str,
    progress: &dyn EvaluationProgress,
) -> Result<EvaluationResult, AppError> {
    if resume_text.trim().is_empty() {
        return Err(AppError::Validation(
            "Invalid or missing resumeText.".to_string(),
        ));
    }

    info!(
        "Evaluating resume ({} chars) with model {}",
        resume_text.chars().count(),
        llm.model()
    );

    let merged = evaluate_all_groups(llm, resume_text, &settings.retry, progress).await?;
    let mut verdicts = merged.verdicts;

    progress.on_event(ProgressEvent::Scoring);
    let card = score_verdicts(&mut verdicts);

    progress.on_event(ProgressEvent::OverviewStarted);
    let overview = synthesize_overview(llm, &verdicts, settings.retry.attempt_timeout).await;

    let usage = merged.usage + overview.usage;
    debug!(
        "Evaluation usage: prompt={}, completion={}, total={}",
        usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
    );

    progress.on_event(ProgressEvent::Finished {
        final_score: card.final_score,
    });
    info!(
        "Evaluation complete: score {} ({:?}), penalty {}/{}",
        card.final_score, card.grade, card.total_weighted_penalty, card.max_possible_penalty
    );

    Ok(EvaluationResult {
        rules: verdicts,
        summary: EvaluationSummary {
            total_weighted_penalty: card.total_weighted_penalty,
            max_possible_penalty: card.max_possible_penalty,
            final_score: card.final_score,
            grade: card.grade,
            overview: overview.sentence,
            top_3_actionable_fixes: card.top_fixes,
        },
        usage,
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::evaluation::models::Grade;
    use crate::evaluation::progress::recording::RecordingProgress;
    use crate::evaluation::progress::NoProgress;
    use crate::evaluation::prompts::OVERVIEW_FALLBACK;
    use crate::evaluation::testing::{valid_group_response, Reply, ScriptedService, REPLY_USAGE};
    use crate::llm_client::{LlmError, TokenUsage};
    use crate::rubric::RUBRIC;

    fn settings() -> EvaluationSettings {
        EvaluationSettings {
            retry: RetryPolicy {
                max_retries: 2,
                attempt_timeout: Duration::from_secs(30),
                backoff: Duration::ZERO,
            },
            pricing: Pricing {
                prompt_usd_per_mtok: 2.50,
                completion_usd_per_mtok: 10.00,
            },
        }
    }

    #[tokio::test]
    async fn test_all_zero_penalties_end_to_end() {
        let service = ScriptedService::new(|call| match call.group_index {
            Some(_) => Ok(valid_group_response(|_| 0)),
            None => Ok(Reply::text("A clean, well-targeted resume.")),
        });

        let result = run_evaluation(&service, &settings(), "Jane Doe\nEngineer", &NoProgress)
            .await
            .unwrap();

        assert_eq!(result.rules.len(), RUBRIC.len());
        assert_eq!(result.summary.total_weighted_penalty, 0);
        assert_eq!(result.summary.max_possible_penalty, 820);
        assert_eq!(result.summary.final_score, 100.0);
        assert_eq!(result.summary.grade, Grade::Excellent);
        assert_eq!(result.summary.overview, "A clean, well-targeted resume.");
        assert_eq!(
            result.summary.top_3_actionable_fixes,
            vec![
                format!("Fix: {}", RUBRIC[0].rule),
                format!("Fix: {}", RUBRIC[1].rule),
                format!("Fix: {}", RUBRIC[2].rule),
            ]
        );
        // 5 group calls + 1 overview call
        assert_eq!(result.usage.total_tokens, 6 * REPLY_USAGE.total_tokens);
        assert_eq!(service.overview_calls(), 1);
    }

    #[tokio::test]
    async fn test_weighted_total_uses_rubric_weights() {
        let service = ScriptedService::new(|call| match call.group_index {
            Some(_) => Ok(valid_group_response(|_| 1)),
            None => Ok(Reply::text("Fine.")),
        });

        let result = run_evaluation(&service, &settings(), "resume", &NoProgress)
            .await
            .unwrap();

        // penalty 1 everywhere → total equals the rubric weight sum
        assert_eq!(result.summary.total_weighted_penalty, 82);
        assert_eq!(result.summary.final_score, 90.0);
        assert_eq!(result.summary.grade, Grade::Excellent);
    }

    #[tokio::test]
    async fn test_overview_failure_keeps_score() {
        let service = ScriptedService::new(|call| match call.group_index {
            Some(_) => Ok(valid_group_response(|d| d.weight)),
            None => Err(LlmError::Api {
                status: 500,
                message: "boom".to_string(),
            }),
        });

        let result = run_evaluation(&service, &settings(), "resume", &NoProgress)
            .await
            .unwrap();

        assert_eq!(result.summary.overview, OVERVIEW_FALLBACK);
        let expected: u32 = RUBRIC.iter().map(|d| d.weight * d.weight).sum();
        assert_eq!(result.summary.total_weighted_penalty, expected);
        // overview tokens are absent, group tokens are not
        assert_eq!(result.usage.total_tokens, 5 * REPLY_USAGE.total_tokens);
    }

    #[tokio::test]
    async fn test_group_failure_returns_no_result_and_skips_overview() {
        let service = ScriptedService::new(|call| match call.group_index {
            Some(0) => Ok(Reply::text("not json")),
            _ => Ok(valid_group_response(|_| 0)),
        });

        let err = run_evaluation(&service, &settings(), "resume", &NoProgress)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::GroupExhausted { .. }));
        assert_eq!(service.overview_calls(), 0);
    }

    #[tokio::test]
    async fn test_blank_resume_is_rejected_before_any_call() {
        let service = ScriptedService::new(|_| Ok(valid_group_response(|_| 0)));

        let err = run_evaluation(&service, &settings(), "  \n\t ", &NoProgress)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(service.group_calls(), 0);
        assert_eq!(service.overview_calls(), 0);
    }

    #[tokio::test]
    async fn test_progress_ends_with_scoring_overview_finished() {
        let service = ScriptedService::new(|call| match call.group_index {
            Some(_) => Ok(valid_group_response(|_| 0)),
            None => Ok(Reply::Empty),
        });
        let progress = RecordingProgress::default();

        run_evaluation(&service, &settings(), "resume", &progress)
            .await
            .unwrap();

        let events = progress.events.lock().unwrap();
        let tail = &events[events.len() - 3..];
        assert_eq!(
            tail,
            &[
                ProgressEvent::Scoring,
                ProgressEvent::OverviewStarted,
                ProgressEvent::Finished { final_score: 100.0 },
            ]
        );
    }

    #[test]
    fn test_settings_from_config() {
        let settings = EvaluationSettings::from_config(&crate::config::test_config());
        assert_eq!(settings.retry.total_attempts(), 3);
        assert_eq!(settings.retry.attempt_timeout, Duration::from_secs(5));
        assert_eq!(settings.pricing.cost_usd(&TokenUsage::default()), 0.0);
    }
}
