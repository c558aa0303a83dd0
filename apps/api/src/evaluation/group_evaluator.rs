//! Group Evaluator — turns one rubric group into a validated `GroupResult`.
//!
//! Every attempt is one billable reasoning-service request. Transport errors,
//! timeouts, empty content and malformed JSON are all "attempt failed"; the loop
//! stops after `max_retries + 1` attempts.

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;
use crate::evaluation::models::{GroupResult, RuleVerdict};
use crate::evaluation::prompt_builder::build_group_prompt;
use crate::evaluation::prompts::{GROUP_EVALUATION_SYSTEM, GROUP_EVALUATION_TEMPERATURE};
use crate::evaluation::verdicts::{parse_group_verdicts, VerdictError};
use crate::llm_client::{CompletionRequest, LlmError, ReasoningService, TokenUsage};
use crate::rubric::RubricGroup;

/// Bounds on how hard a single group is retried.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Additional attempts after the first failure.
    pub max_retries: u32,
    /// Wall-clock limit for one attempt. Elapsing counts as a failed attempt.
    pub attempt_timeout: Duration,
    /// Delay before the first retry; doubles per retry. Zero disables sleeping.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            attempt_timeout: Duration::from_secs(90),
            backoff: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_retries: config.group_max_retries,
            attempt_timeout: Duration::from_secs(config.attempt_timeout_secs),
            backoff: Duration::from_millis(config.retry_backoff_ms),
        }
    }

    pub fn total_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay before `attempt` (1-based). The first attempt never waits.
    fn delay_before(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        let exponent = (attempt - 2).min(6);
        self.backoff * (1u32 << exponent)
    }
}

/// Why one attempt failed.
#[derive(Debug, Error)]
pub enum AttemptError {
    #[error("reasoning service error: {0}")]
    Service(#[from] LlmError),

    #[error("attempt timed out after {0:?}")]
    Timeout(Duration),

    #[error("malformed response: {0}")]
    Malformed(#[from] VerdictError),
}

#[derive(Debug, Error)]
pub enum GroupError {
    #[error("Max retries reached for rule group '{group}' after {attempts} attempts: {last_error}")]
    Exhausted {
        group: &'static str,
        attempts: u32,
        last_error: String,
    },

    #[error("failed to build prompt for rule group '{group}': {source}")]
    Prompt {
        group: &'static str,
        source: serde_json::Error,
    },
}

/// Grades one rubric group, retrying failed attempts within `policy`.
pub async fn evaluate_group(
    llm: &dyn ReasoningService,
    group: &RubricGroup<'_>,
    resume_text: &str,
    policy: &RetryPolicy,
) -> Result<GroupResult, GroupError> {
    let prompt = build_group_prompt(group, resume_text).map_err(|source| GroupError::Prompt {
        group: group.name,
        source,
    })?;

    let total_attempts = policy.total_attempts();
    let mut last_error = String::new();

    for attempt in 1..=total_attempts {
        let delay = policy.delay_before(attempt);
        if !delay.is_zero() {
            debug!(
                "Rule group '{}' backing off {}ms before attempt {}",
                group.name,
                delay.as_millis(),
                attempt
            );
            tokio::time::sleep(delay).await;
        }

        match run_attempt(llm, group, &prompt, policy.attempt_timeout).await {
            Ok((verdicts, usage)) => {
                debug!(
                    "Rule group '{}' graded on attempt {}/{}: {} verdicts, {} tokens",
                    group.name,
                    attempt,
                    total_attempts,
                    verdicts.len(),
                    usage.total_tokens
                );
                return Ok(GroupResult {
                    verdicts,
                    usage,
                    attempts: attempt,
                });
            }
            Err(e) => {
                warn!(
                    "Rule group '{}' attempt {}/{} failed: {}",
                    group.name, attempt, total_attempts, e
                );
                last_error = e.to_string();
            }
        }
    }

    Err(GroupError::Exhausted {
        group: group.name,
        attempts: total_attempts,
        last_error,
    })
}

async fn run_attempt(
    llm: &dyn ReasoningService,
    group: &RubricGroup<'_>,
    prompt: &str,
    timeout: Duration,
) -> Result<(Vec<RuleVerdict>, TokenUsage), AttemptError> {
    let request = CompletionRequest {
        system: GROUP_EVALUATION_SYSTEM,
        prompt,
        temperature: GROUP_EVALUATION_TEMPERATURE,
    };

    let completion = tokio::time::timeout(timeout, llm.complete(request))
        .await
        .map_err(|_| AttemptError::Timeout(timeout))??;

    let content = completion.content.ok_or(LlmError::EmptyContent)?;
    let verdicts = parse_group_verdicts(&content, group)?;

    Ok((verdicts, completion.usage))
}
