//! Test double for the reasoning service.
//!
//! A script closure decides each reply. The mock works out which rubric group a prompt
//! targets, counts attempts per group, and renders `Reply::Verdicts` into a valid
//! JSON array for that group.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::evaluation::prompts::OVERVIEW_SYSTEM;
use crate::llm_client::{Completion, CompletionRequest, LlmError, ReasoningService, TokenUsage};
use crate::rubric::{rubric_groups, RubricGroup, RuleDefinition};

pub type PenaltyFn = Arc<dyn Fn(&RuleDefinition) -> u32 + Send + Sync>;

pub const REPLY_USAGE: TokenUsage = TokenUsage {
    prompt_tokens: 100,
    completion_tokens: 50,
    total_tokens: 150,
};

pub enum Reply {
    Text(String),
    Empty,
    Verdicts(PenaltyFn),
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Reply::Text(text.into())
    }
}

/// A reply grading every rule of the targeted group.
pub fn valid_group_response(
    penalty: impl Fn(&RuleDefinition) -> u32 + Send + Sync + 'static,
) -> Reply {
    Reply::Verdicts(Arc::new(penalty))
}

/// The JSON array a well-behaved model would return for `group`.
pub fn verdicts_json(group: &RubricGroup<'_>, penalty: &dyn Fn(&RuleDefinition) -> u32) -> Value {
    Value::Array(
        group
            .rules
            .iter()
            .map(|def| {
                let p = penalty(def);
                json!({
                    "rule": def.rule,
                    "category": def.category,
                    "weight": def.weight,
                    "penalty": p,
                    "weighted_penalty": p * def.weight,
                    "note": format!("Assessment of {}", def.rule),
                    "suggestion": format!("Fix: {}", def.rule),
                    "trigger": null,
                    "keywords": null
                })
            })
            .collect(),
    )
}

/// What the script sees for each call.
pub struct ScriptedCall {
    /// Rubric group the prompt targets; `None` for the overview call.
    pub group_index: Option<usize>,
    /// 1-based attempt counter for that group (or for overview calls).
    pub group_attempt: u32,
    pub prompt: String,
}

type Script = dyn Fn(&ScriptedCall) -> Result<Reply, LlmError> + Send + Sync;

pub struct ScriptedService {
    script: Box<Script>,
    group_attempts: Mutex<[u32; 5]>,
    overview_attempts: AtomicU32,
    hang_attempts: Vec<u32>,
    group_delays: Vec<Duration>,
}

impl ScriptedService {
    pub fn new(
        script: impl Fn(&ScriptedCall) -> Result<Reply, LlmError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            script: Box::new(script),
            group_attempts: Mutex::new([0; 5]),
            overview_attempts: AtomicU32::new(0),
            hang_attempts: Vec::new(),
            group_delays: Vec::new(),
        }
    }

    /// Group attempts with these numbers never resolve.
    pub fn hang_on_attempts(mut self, attempts: &[u32]) -> Self {
        self.hang_attempts = attempts.to_vec();
        self
    }

    /// Per-group response latency, indexed by group.
    pub fn with_group_delays(mut self, delays: Vec<Duration>) -> Self {
        self.group_delays = delays;
        self
    }

    pub fn group_calls(&self) -> u32 {
        self.group_attempts.lock().unwrap().iter().sum()
    }

    pub fn calls_for_group(&self, index: usize) -> u32 {
        self.group_attempts.lock().unwrap()[index]
    }

    pub fn overview_calls(&self) -> u32 {
        self.overview_attempts.load(Ordering::SeqCst)
    }

    fn render(reply: Reply, group_index: Option<usize>) -> Completion {
        let content = match reply {
            Reply::Empty => return Completion::default(),
            Reply::Text(text) => text,
            Reply::Verdicts(penalty) => {
                let groups = rubric_groups().unwrap();
                let group = &groups[group_index.expect("verdicts requested for overview call")];
                verdicts_json(group, penalty.as_ref()).to_string()
            }
        };
        Completion {
            content: Some(content),
            usage: REPLY_USAGE,
        }
    }
}

fn target_group(prompt: &str) -> Option<usize> {
    rubric_groups()
        .unwrap()
        .iter()
        .position(|g| prompt.contains(&format!("\"rule\": \"{}\"", g.rules[0].rule)))
}

#[async_trait]
impl ReasoningService for ScriptedService {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<Completion, LlmError> {
        let is_overview = request.system == OVERVIEW_SYSTEM;
        let group_index = if is_overview {
            None
        } else {
            target_group(request.prompt)
        };

        let group_attempt = match group_index {
            Some(index) => {
                let mut attempts = self.group_attempts.lock().unwrap();
                attempts[index] += 1;
                attempts[index]
            }
            None => self.overview_attempts.fetch_add(1, Ordering::SeqCst) + 1,
        };

        if let Some(index) = group_index {
            if self.hang_attempts.contains(&group_attempt) {
                return std::future::pending().await;
            }
            if let Some(delay) = self.group_delays.get(index) {
                tokio::time::sleep(*delay).await;
            }
        }

        let call = ScriptedCall {
            group_index,
            group_attempt,
            prompt: request.prompt.to_string(),
        };
        let reply = (self.script)(&call)?;
        Ok(Self::render(reply, group_index))
    }

    fn model(&self) -> &str {
        "scripted"
    }
}
