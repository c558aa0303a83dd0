//! Evaluation Coordinator — grades all rubric groups concurrently and merges them.
//!
//! All five group futures are polled together inside the caller's task (`tokio::join!`).
//! Results are only inspected once every group has settled, then merged in partition order, so
//! completion order never leaks into the verdict sequence.

use anyhow::anyhow;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::evaluation::group_evaluator::{evaluate_group, GroupError, RetryPolicy};
use crate::evaluation::models::{GroupResult, RuleVerdict};
use crate::evaluation::progress::{EvaluationProgress, ProgressEvent};
use crate::llm_client::{ReasoningService, TokenUsage};
use crate::rubric::{rubric_groups, RubricGroup, RUBRIC};

/// All verdicts in rubric order plus the summed usage of the group calls.
#[derive(Debug, Clone)]
pub struct MergedVerdicts {
    pub verdicts: Vec<RuleVerdict>,
    pub usage: TokenUsage,
}

pub async fn evaluate_all_groups(
    llm: &dyn ReasoningService,
    resume_text: &str,
    policy: &RetryPolicy,
    progress: &dyn EvaluationProgress,
) -> Result<MergedVerdicts, AppError> {
    let groups = rubric_groups().map_err(|e| AppError::Internal(e.into()))?;
    let [g0, g1, g2, g3, g4] = groups.as_slice() else {
        return Err(AppError::Internal(anyhow!(
            "expected 5 rubric groups, got {}",
            groups.len()
        )));
    };

    let (r0, r1, r2, r3, r4) = tokio::join!(
        run_group(llm, g0, resume_text, policy, progress),
        run_group(llm, g1, resume_text, policy, progress),
        run_group(llm, g2, resume_text, policy, progress),
        run_group(llm, g3, resume_text, policy, progress),
        run_group(llm, g4, resume_text, policy, progress),
    );
    let outcomes = [r0, r1, r2, r3, r4];

    let mut results = Vec::with_capacity(outcomes.len());
    let mut first_error: Option<GroupError> = None;
    let mut discarded = TokenUsage::default();

    for outcome in outcomes {
        match outcome {
            Ok(result) => {
                discarded += result.usage;
                results.push(result);
            }
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }

    if let Some(error) = first_error {
        if discarded.total_tokens > 0 {
            warn!(
                "Evaluation aborted: discarding {} successful group(s) that used {} tokens \
                (prompt={}, completion={})",
                results.len(),
                discarded.total_tokens,
                discarded.prompt_tokens,
                discarded.completion_tokens
            );
        }
        return Err(error.into());
    }

    merge_group_results(results)
}

async fn run_group(
    llm: &dyn ReasoningService,
    group: &RubricGroup<'_>,
    resume_text: &str,
    policy: &RetryPolicy,
    progress: &dyn EvaluationProgress,
) -> Result<GroupResult, GroupError> {
    progress.on_event(ProgressEvent::GroupStarted {
        index: group.index,
        name: group.name,
    });

    let outcome = evaluate_group(llm, group, resume_text, policy).await;

    progress.on_event(match &outcome {
        Ok(result) => ProgressEvent::GroupCompleted {
            index: group.index,
            name: group.name,
            attempts: result.attempts,
        },
        Err(_) => ProgressEvent::GroupFailed {
            index: group.index,
            name: group.name,
        },
    });

    outcome
}

/// Concatenates group verdicts (already in partition order) and checks that the merged
/// sequence holds exactly one verdict per rubric rule, at the rule's rubric position.
pub fn merge_group_results(results: Vec<GroupResult>) -> Result<MergedVerdicts, AppError> {
    let mut verdicts = Vec::with_capacity(RUBRIC.len());
    let mut usage = TokenUsage::default();

    for result in results {
        usage += result.usage;
        verdicts.extend(result.verdicts);
    }

    if verdicts.len() != RUBRIC.len() {
        return Err(AppError::MergeIntegrity(format!(
            "expected {} rule verdicts, got {}",
            RUBRIC.len(),
            verdicts.len()
        )));
    }

    if let Some((position, verdict)) = verdicts
        .iter()
        .enumerate()
        .find(|(i, v)| v.rule != RUBRIC[*i].rule)
    {
        return Err(AppError::MergeIntegrity(format!(
            "verdict at position {position} is '{}', expected '{}'",
            verdict.rule, RUBRIC[position].rule
        )));
    }

    info!(
        "Merged {} verdicts ({} tokens)",
        verdicts.len(),
        usage.total_tokens
    );

    Ok(MergedVerdicts { verdicts, usage })
}
